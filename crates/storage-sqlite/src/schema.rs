// Table declarations for the valuation database.
//
// Dates are stored as ISO-8601 text (`YYYY-MM-DD`), timestamps as ISO-8601
// text with fractional seconds, and decimals as text to avoid float drift.

diesel::table! {
    transactions (id) {
        id -> Text,
        client_code -> Text,
        isin -> Text,
        transaction_date -> Text,
        transaction_type -> Text,
        units -> Text,
        nav -> Text,
        amount -> Text,
        seq -> BigInt,
        created_at -> Text,
    }
}

diesel::table! {
    instrument_prices (isin, price_date) {
        isin -> Text,
        price_date -> Text,
        nav -> Text,
    }
}

diesel::table! {
    holdings (client_code, isin) {
        client_code -> Text,
        isin -> Text,
        quantity -> Text,
        average_cost -> Text,
        inception_date -> Text,
    }
}

diesel::table! {
    portfolio_timeseries (id) {
        id -> Text,
        client_code -> Text,
        date -> Text,
        portfolio_value -> Text,
        invested_value -> Text,
        day_change -> Text,
        day_change_pct -> Nullable<Text>,
        cumulative_return_pct -> Nullable<Text>,
        holdings_count -> Integer,
        calculated_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    transactions,
    instrument_prices,
    holdings,
    portfolio_timeseries,
);
