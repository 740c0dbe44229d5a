//! Wire shapes of the invocation boundary.
//!
//! Field names are part of the contract with existing callers:
//! `{"inputUri", "framesPerJob"}` in, `{"statusCode", "body": {"arrayJobSize", "texture"}}` out.

use crate::error::{HandlerError, Result};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(alias = "sourceUri")]
    pub input_uri: String,
    #[serde(deserialize_with = "frames_per_job")]
    pub frames_per_job: u32,
}

impl JobRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HandlerError::InvalidRequest(e.to_string()))
    }
}

/// Event producers send this either as a number or as a numeric string.
fn frames_per_job<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n,
        Raw::Text(s) => s.trim().parse::<u64>().map_err(|_| {
            serde::de::Error::custom(format!("framesPerJob is not a positive integer: {s:?}"))
        })?,
    };
    if value == 0 {
        return Err(serde::de::Error::custom("framesPerJob must be positive"));
    }
    u32::try_from(value).map_err(|_| serde::de::Error::custom("framesPerJob is too large"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponseBody {
    pub array_job_size: i64,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub status_code: u16,
    pub body: JobResponseBody,
}

impl JobResponse {
    pub fn ok(array_job_size: i64, texture: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: JobResponseBody {
                array_job_size,
                texture: texture.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_with_integer() {
        let req =
            JobRequest::from_json(r#"{"inputUri": "s3://b/scene.blend", "framesPerJob": 50}"#)
                .unwrap();
        assert_eq!(req.input_uri, "s3://b/scene.blend");
        assert_eq!(req.frames_per_job, 50);
    }

    #[test]
    fn test_request_with_numeric_string_and_alias() {
        let req = JobRequest::from_json(r#"{"sourceUri": "s3://b/k.blend", "framesPerJob": " 25"}"#)
            .unwrap();
        assert_eq!(req.input_uri, "s3://b/k.blend");
        assert_eq!(req.frames_per_job, 25);
    }

    #[test]
    fn test_request_rejects_bad_frames_per_job() {
        for body in [
            r#"{"inputUri": "a", "framesPerJob": 0}"#,
            r#"{"inputUri": "a", "framesPerJob": -3}"#,
            r#"{"inputUri": "a", "framesPerJob": "ten"}"#,
            r#"{"inputUri": "a", "framesPerJob": 99999999999}"#,
            r#"{"inputUri": "a"}"#,
        ] {
            assert!(
                matches!(JobRequest::from_json(body), Err(HandlerError::InvalidRequest(_))),
                "{body} should be rejected"
            );
        }
    }

    #[test]
    fn test_response_shape() {
        let resp = JobResponse::ok(5, "/tmp/Place_designs_here_Tshirt.psd");
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "statusCode": 200,
                "body": {
                    "arrayJobSize": 5,
                    "texture": "/tmp/Place_designs_here_Tshirt.psd"
                }
            })
        );
    }
}
