//! HTTP client for the RunPod GraphQL account API.

use super::snapshot::AccountSnapshot;
use crate::error::ExportError;
use std::time::Duration;
use tracing::debug;

const API_URL: &str = "https://api.runpod.io/graphql";
const API_TIMEOUT: Duration = Duration::from_secs(15);

/// The fixed account query. Requests exactly the fields the snapshot
/// models; the response schema is owned by RunPod.
const ACCOUNT_QUERY: &str = "\
query myself {
    myself {
        currentSpendPerHr
        referralEarned
        templateEarned
        clientBalance
        hostBalance
        minBalance
        spendLimit
        machineQuota
        maxServerlessConcurrency
        referral {
            currentMonth {
                totalReferrals
                totalSpend
            }
        }
        spendDetails {
            localStoragePerHour
            networkStoragePerHour
            gpuComputePerHour
        }
        pods {
            id
            desiredStatus
            costPerHr
            runtime {
                uptimeInSeconds
            }
        }
        endpoints {
            id
            workersMin
            workersMax
        }
        networkVolumes {
            id
            size
        }
        savingsPlans {
            savingsPlanType
        }
    }
}";

/// Performs the single authenticated query for this run.
///
/// One attempt, no retries; the agent's global timeout bounds how long an
/// unreachable host can stall the run. The credential travels as a URL
/// query parameter and must never be logged.
pub fn fetch_account(api_key: &str) -> Result<AccountSnapshot, ExportError> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(API_TIMEOUT))
        .http_status_as_error(false)
        .build()
        .into();

    let request_body = serde_json::json!({ "query": ACCOUNT_QUERY }).to_string();

    debug!(url = API_URL, "querying account API");
    let mut response = agent
        .post(format!("{API_URL}?api_key={api_key}"))
        .header("Content-Type", "application/json")
        .send(&request_body)?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string()?;

    parse_response(status, &body)
}

/// Splits the response protocol from transport so it can be tested with
/// fixtures. HTTP 200 with no `errors` field is the only success shape.
fn parse_response(status: u16, body: &str) -> Result<AccountSnapshot, ExportError> {
    if status != 200 {
        return Err(ExportError::Http {
            status,
            body: body.to_string(),
        });
    }

    let envelope: serde_json::Value = serde_json::from_str(body)?;
    if let Some(errors) = envelope.get("errors") {
        return Err(ExportError::Api {
            payload: errors.clone(),
        });
    }

    let myself = envelope
        .pointer("/data/myself")
        .filter(|value| !value.is_null())
        .ok_or(ExportError::MissingField("data.myself"))?;

    Ok(serde_json::from_value(myself.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn myself_fixture() -> serde_json::Value {
        json!({
            "currentSpendPerHr": 1.23,
            "referralEarned": 0.5,
            "templateEarned": 0.0,
            "clientBalance": 10.0,
            "hostBalance": 0.0,
            "minBalance": 2.0,
            "spendLimit": 50.0,
            "machineQuota": 5,
            "maxServerlessConcurrency": 8,
            "referral": {
                "currentMonth": { "totalReferrals": 3, "totalSpend": 7.5 }
            },
            "spendDetails": {
                "localStoragePerHour": 0.01,
                "networkStoragePerHour": 0.02,
                "gpuComputePerHour": 1.2
            },
            "pods": [
                {
                    "id": "pod-a",
                    "desiredStatus": "RUNNING",
                    "costPerHr": 0.6,
                    "runtime": { "uptimeInSeconds": 120 }
                },
                {
                    "id": "pod-b",
                    "desiredStatus": "EXITED",
                    "costPerHr": 0.0,
                    "runtime": null
                }
            ],
            "endpoints": [],
            "networkVolumes": [
                { "id": "vol-1", "size": 100 }
            ],
            "savingsPlans": [
                { "savingsPlanType": "monthly" }
            ]
        })
    }

    fn response_body(myself: serde_json::Value) -> String {
        json!({ "data": { "myself": myself } }).to_string()
    }

    #[test]
    fn parses_successful_response() {
        let snapshot = parse_response(200, &response_body(myself_fixture())).unwrap();

        assert_eq!(snapshot.current_spend_per_hr, 1.23);
        assert_eq!(snapshot.client_balance, 10.0);
        assert_eq!(snapshot.pods.len(), 2);
        assert!(snapshot.pods[0].runtime.is_some());
        assert!(snapshot.pods[1].runtime.is_none());
        assert!(snapshot.endpoints.is_empty());
        assert_eq!(snapshot.savings_plans.len(), 1);
    }

    #[test]
    fn non_200_is_http_error() {
        let err = parse_response(500, "server exploded").unwrap_err();

        match err {
            ExportError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "server exploded");
            }
            other => panic!("expected Http error, got {other}"),
        }
    }

    #[test]
    fn errors_field_is_api_error_even_on_200() {
        let body = json!({
            "errors": [{ "message": "Invalid API key" }],
            "data": null
        })
        .to_string();

        let err = parse_response(200, &body).unwrap_err();

        match err {
            ExportError::Api { payload } => {
                assert!(payload.to_string().contains("Invalid API key"));
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = parse_response(200, "not json").unwrap_err();

        assert!(matches!(err, ExportError::Parse(_)));
    }

    #[test]
    fn null_myself_is_missing_field() {
        let body = json!({ "data": { "myself": null } }).to_string();

        let err = parse_response(200, &body).unwrap_err();

        assert!(matches!(err, ExportError::MissingField("data.myself")));
    }

    #[test]
    fn incomplete_myself_fails_parse() {
        let mut myself = myself_fixture();
        myself.as_object_mut().unwrap().remove("clientBalance");

        let err = parse_response(200, &response_body(myself)).unwrap_err();

        assert!(matches!(err, ExportError::Parse(_)));
    }
}
