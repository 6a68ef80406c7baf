use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with a fixed per-request timeout.
    ///
    /// No retry middleware: brokerage calls are single-shot and the quote
    /// client runs its own bounded backoff for historical lookups.
    pub fn create_client(timeout: Duration) -> reqwest::Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("robinfolio/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

/// Helper function to build a path with query parameters.
///
/// Parameters keep the caller's order and `None` values are skipped. Values are
/// appended verbatim, without percent-encoding: the brokerage signs the path
/// exactly as sent, so the signed and the transmitted strings must match.
pub fn build_path_with_query<K, V>(base_path: &str, params: &[(K, Option<V>)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let query_string: String = params
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| format!("{}={}", k.as_ref(), v.as_ref())))
        .collect::<Vec<_>>()
        .join("&");

    if query_string.is_empty() {
        return base_path.to_string();
    }

    if base_path.contains('?') {
        format!("{}&{}", base_path, query_string)
    } else {
        format!("{}?{}", base_path, query_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_params_leaves_path_untouched() {
        let params: [(&str, Option<&str>); 0] = [];
        assert_eq!(
            build_path_with_query("/api/v1/crypto/trading/holdings/", &params),
            "/api/v1/crypto/trading/holdings/"
        );
    }

    #[test]
    fn test_params_keep_order_and_skip_none() {
        let params = [
            ("asset_code", Some("BTC")),
            ("asset_code", None),
            ("asset_code", Some("ETH")),
            ("limit", Some("10")),
        ];
        assert_eq!(
            build_path_with_query("/api/v1/crypto/trading/holdings/", &params),
            "/api/v1/crypto/trading/holdings/?asset_code=BTC&asset_code=ETH&limit=10"
        );
    }

    #[test]
    fn test_all_none_gives_no_question_mark() {
        let params = [("cursor", None::<String>), ("limit", None)];
        assert_eq!(build_path_with_query("/x/", &params), "/x/");
    }

    #[test]
    fn test_values_are_not_encoded() {
        let params = [("created_at_start", Some("2024-01-01T00:00:00Z"))];
        assert_eq!(
            build_path_with_query("/orders/", &params),
            "/orders/?created_at_start=2024-01-01T00:00:00Z"
        );
    }
}
