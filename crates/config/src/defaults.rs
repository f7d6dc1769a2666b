pub fn default_enabled() -> bool {
    true
}

pub fn default_service_name() -> String {
    "tickerwire".to_string()
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8080
}

pub fn default_request_timeout_seconds() -> u64 {
    120
}

pub fn default_market_data_url() -> String {
    "https://data.alpaca.markets".to_string()
}

pub fn default_market_news_url() -> String {
    "https://data.alpaca.markets/v1beta1/news".to_string()
}

pub fn default_fetch_timeout_seconds() -> u64 {
    10
}

pub fn default_news_limit() -> u32 {
    5
}

pub fn default_previous_close_lookback_days() -> u32 {
    5
}

pub fn default_world_news_url() -> String {
    "https://newsapi.org/v2".to_string()
}

pub fn default_country() -> String {
    "us".to_string()
}

pub fn default_page_size() -> u32 {
    5
}

pub fn default_max_world_articles() -> usize {
    10
}

pub fn default_generation_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub fn default_generation_timeout_seconds() -> u64 {
    60
}

pub fn default_prompt_version() -> String {
    "v1".to_string()
}

pub fn default_temperature() -> f32 {
    0.7
}

pub fn default_daily_cap() -> u32 {
    50
}

pub fn default_watchlist() -> Vec<String> {
    [
        "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "JPM", "JNJ", "V", "PG", "UNH",
        "HD", "MA", "BAC", "XOM", "CVX", "PFE", "CSCO", "ADBE", "NFLX", "CRM", "KO", "PEP", "TMO",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_max_events_per_run() -> usize {
    3
}

pub fn default_baseline_volume() -> f64 {
    1_000_000.0
}

pub fn default_detection_concurrency() -> usize {
    5
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_revalidate_timeout_seconds() -> u64 {
    5
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
