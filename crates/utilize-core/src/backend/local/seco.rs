//! Serialization and compression helper

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;

use crate::backend::{BackendError, BackendResult};
use crate::resolve::{CompressFormat, SecoParams, SerializeFormat};

/// Encodes structured values to compressed bytes and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeCo {
    params: SecoParams,
}

impl SeCo {
    pub fn new(params: &SecoParams) -> BackendResult<Self> {
        if params.serialize == SerializeFormat::Pickle {
            return Err(BackendError::Unsupported {
                what: "pickle serialization".into(),
            });
        }
        if params.compress == CompressFormat::Bz2 {
            return Err(BackendError::Unsupported {
                what: "bz2 compression".into(),
            });
        }
        Ok(Self { params: *params })
    }

    pub fn params(&self) -> &SecoParams {
        &self.params
    }

    pub fn dumps(&self, value: &Value) -> BackendResult<Vec<u8>> {
        let raw = match self.params.serialize {
            SerializeFormat::Json => {
                serde_json::to_vec(value).map_err(|e| BackendError::Encode(e.to_string()))?
            }
            _ => rmp_serde::to_vec(value).map_err(|e| BackendError::Encode(e.to_string()))?,
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        Ok(encoder.finish()?)
    }

    pub fn loads(&self, data: &[u8]) -> BackendResult<Value> {
        let mut raw = Vec::new();
        ZlibDecoder::new(data)
            .read_to_end(&mut raw)
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        match self.params.serialize {
            SerializeFormat::Json => {
                serde_json::from_slice(&raw).map_err(|e| BackendError::Decode(e.to_string()))
            }
            _ => rmp_serde::from_slice(&raw).map_err(|e| BackendError::Decode(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_msgpack_and_json_both_restore_values() {
        let value = json!({"name": "job", "tries": 3, "tags": ["a", "b"], "done": false});

        for serialize in [SerializeFormat::Json, SerializeFormat::Msgpack] {
            let seco = SeCo::new(&SecoParams {
                serialize,
                compress: CompressFormat::Zlib,
            })
            .unwrap();
            let bytes = seco.dumps(&value).unwrap();
            assert_eq!(seco.loads(&bytes).unwrap(), value, "{serialize}");
        }
    }

    #[test]
    fn test_output_is_zlib_compressed() {
        let seco = SeCo::new(&SecoParams::default()).unwrap();
        let bytes = seco.dumps(&json!("x".repeat(512))).unwrap();

        assert!(bytes.len() < 100);
        assert_eq!(bytes[0], 0x78);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let seco = SeCo::new(&SecoParams::default()).unwrap();
        assert!(matches!(seco.loads(b"not zlib"), Err(BackendError::Decode(_))));
    }

    #[test]
    fn test_pickle_and_bz2_are_unsupported() {
        let pickle = SecoParams {
            serialize: SerializeFormat::Pickle,
            ..SecoParams::default()
        };
        let bz2 = SecoParams {
            compress: CompressFormat::Bz2,
            ..SecoParams::default()
        };
        assert!(matches!(SeCo::new(&pickle), Err(BackendError::Unsupported { .. })));
        assert!(matches!(SeCo::new(&bz2), Err(BackendError::Unsupported { .. })));
    }
}
