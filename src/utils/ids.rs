use mongodb::bson::oid::ObjectId;

use crate::error::AppError;

/// Parses the 24-hex text form of an ObjectId, mapping failure to `InvalidInput`
/// with the caller's detail message.
pub fn parse_object_id(raw: &str, detail: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::invalid(detail))
}
