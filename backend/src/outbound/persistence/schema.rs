//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Applicants and their verification state.
    ///
    /// `id` is supplied by the caller, not generated by the database.
    users (id) {
        id -> Int8,
        national_id -> Nullable<Varchar>,
        full_name -> Nullable<Varchar>,
        legal_name -> Nullable<Varchar>,
        birth_place -> Nullable<Varchar>,
        birth_date -> Nullable<Date>,
        salary -> Nullable<Float8>,
        national_id_photo -> Nullable<Bytea>,
        user_photo -> Nullable<Bytea>,
        is_national_id_validated -> Bool,
        is_photo_validated -> Bool,
        is_salary_validated -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        created_by -> Nullable<Varchar>,
        updated_by -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Reference table of loan products.
    loan_type (id) {
        id -> Int2,
        name -> Varchar,
    }
}

diesel::table! {
    /// Reference table of credit limits per tenor.
    limit_type (id) {
        id -> Int2,
        amount -> Nullable<Float8>,
        term -> Int2,
    }
}

diesel::table! {
    /// Loans; `(user_id, contract_number)` is unique.
    loan (id) {
        id -> Int8,
        user_id -> Int8,
        contract_number -> Varchar,
        otr_amount -> Float8,
        principal_amount -> Float8,
        asset_name -> Varchar,
        loan_type_id -> Nullable<Int2>,
        limit_type_id -> Nullable<Int2>,
        status -> Nullable<Varchar>,
        start_date -> Nullable<Timestamptz>,
        interest_rate -> Nullable<Float8>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Payments recorded against a loan.
    loan_payment (id) {
        id -> Int8,
        loan_id -> Int8,
        amount -> Float8,
        date -> Timestamptz,
        channel -> Varchar,
    }
}

diesel::joinable!(loan -> loan_type (loan_type_id));
diesel::joinable!(loan -> limit_type (limit_type_id));
diesel::joinable!(loan_payment -> loan (loan_id));

diesel::allow_tables_to_appear_in_same_query!(users, loan_type, limit_type, loan, loan_payment);
