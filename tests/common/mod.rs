//! Common test utilities for uid-metadata integration tests

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use uid_metadata::{Config, HttpMetadataClient, MetadataTabulator};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock metadata service listens on
pub const METADATA_PATH: &str = "/auth/get-user-metadata";

/// Default configuration with the metadata client pointed at `server`
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.metadata.base_url = format!("{}{}", server.uri(), METADATA_PATH);
    config.metadata.timeout = Duration::from_secs(2);
    config
}

/// Tabulator backed by a real HTTP client
pub fn tabulator_for(config: &Config) -> MetadataTabulator {
    let client = HttpMetadataClient::new(&config.metadata).expect("valid metadata config");
    MetadataTabulator::new(Arc::new(client))
}

/// Serve a full profile for `user_id`
pub async fn mount_full_profile(server: &MockServer, user_id: &str) {
    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .and(query_param("userId", user_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {
                "displayName": format!("Student {user_id}"),
                "first_name": "Asha",
                "last_name": "Rao",
                "gender": "F",
                "college": "IIT Madras",
                "dob": { "day": 14, "month": 3, "year": 1999 },
                "dh": { "newsLetter": { "email": format!("{user_id}@example.com") } }
            }
        })))
        .mount(server)
        .await;
}

/// Answer `user_id` with `status` and a plain-text body
pub async fn mount_failure(server: &MockServer, user_id: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .and(query_param("userId", user_id))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Read every row of `sheet` back as strings
pub fn read_sheet(bytes: &[u8], sheet: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes.to_vec())).expect("valid xlsx");
    let range = workbook.worksheet_range(sheet).expect("sheet exists");
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}
