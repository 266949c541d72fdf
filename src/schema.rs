// Diesel table definitions. Kept in sync with `DbContext::init_schema`.

diesel::table! {
    activity_logs (id) {
        id -> Text,
        user_id -> Nullable<Text>,
        user_email -> Text,
        action -> Text,
        description -> Text,
        ip_address -> Nullable<Text>,
        browser_info -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    draft_copies (id) {
        id -> Text,
        user_id -> Nullable<Text>,
        category -> Text,
        year -> Text,
        file_name -> Text,
        file_path -> Text,
        file_size -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    final_copies (id) {
        id -> Text,
        user_id -> Nullable<Text>,
        category -> Text,
        year -> Text,
        file_name -> Text,
        file_path -> Text,
        file_size -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    profiles (id) {
        id -> Text,
        user_id -> Text,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        contact_number -> Text,
        alternative_contact_number -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    sessions (token) {
        token -> Text,
        user_id -> Text,
        created_at -> Text,
        expires_at -> Text,
    }
}

diesel::table! {
    tax_information_forms (id) {
        id -> Text,
        user_id -> Nullable<Text>,
        category -> Text,
        year -> Text,
        file_name -> Text,
        file_path -> Text,
        file_size -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    uploaded_documents (id) {
        id -> Text,
        user_id -> Nullable<Text>,
        category -> Text,
        year -> Text,
        file_name -> Text,
        file_path -> Text,
        file_size -> Nullable<BigInt>,
        created_at -> Text,
    }
}

diesel::table! {
    users (id) {
        id -> Text,
        email -> Text,
        password_hash -> Text,
        role -> Text,
        created_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    activity_logs,
    draft_copies,
    final_copies,
    profiles,
    sessions,
    tax_information_forms,
    uploaded_documents,
    users,
);
