use super::*;

fn test_client(base_url: &str) -> MapsClient {
    MapsClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_joins_path_and_appends_key_last() {
    let client = test_client("https://maps.example.com/maps/api");
    let url = client
        .build_url("place/details/json", &[("place_id", "abc")])
        .expect("url");
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/maps/api/place/details/json?place_id=abc&key=test-key"
    );
}

#[test]
fn build_url_tolerates_trailing_slash() {
    let client = test_client("https://maps.example.com/maps/api/");
    let url = client
        .build_url("geocode/json", &[("latlng", "1,2")])
        .expect("url");
    assert_eq!(url.path(), "/maps/api/geocode/json");
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://maps.example.com");
    let url = client
        .build_url("place/nearbysearch/json", &[("keyword", "bar OR night_club & pub")])
        .expect("url");
    assert!(
        url.as_str().contains("bar+OR+night_club+%26+pub"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn photo_url_carries_width_reference_and_key() {
    let client = test_client("https://maps.example.com/maps/api");
    let url = client.photo_url("AZose0k/xyz", 1000).expect("url");
    assert_eq!(url.path(), "/maps/api/place/photo");

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.contains(&("maxwidth".to_string(), "1000".to_string())));
    assert!(pairs.contains(&("photo_reference".to_string(), "AZose0k/xyz".to_string())));
    assert!(pairs.contains(&("key".to_string(), "test-key".to_string())));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = MapsClient::with_base_url("k", 5, "not a url").unwrap_err();
    assert!(matches!(err, MapsError::InvalidBaseUrl { .. }));
}

#[test]
fn debug_output_redacts_key() {
    let client = test_client("https://maps.example.com").with_region("Kenya");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("test-key"));
    assert!(rendered.contains("Kenya"));
}
