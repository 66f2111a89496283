//! Diesel table definitions matching `backend/migrations`.

diesel::table! {
    teas (id) {
        id -> Int8,
        name -> Text,
        provider -> Text,
        source -> Nullable<Text>,
    }
}

diesel::table! {
    users (id) {
        id -> Int8,
        name -> Text,
    }
}

diesel::table! {
    tea_ratings (id) {
        id -> Int8,
        user_id -> Int8,
        tea_id -> Int8,
        umami -> Float8,
        astringency -> Float8,
        floral -> Float8,
        vegetal -> Float8,
        nutty -> Float8,
        roasted -> Float8,
        body -> Float8,
        rating -> Float8,
    }
}

diesel::joinable!(tea_ratings -> teas (tea_id));
diesel::joinable!(tea_ratings -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(teas, users, tea_ratings);
