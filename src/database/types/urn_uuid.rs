use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use uuid::Uuid;

const URN_UUID_PREFIX: &str = "urn:uuid:";

/// Archival bag identifier in `urn:uuid:<uuid>` form, with sqlx Encode/Decode.
///
/// Malformed identifiers are rejected at parse time so the stores only ever
/// see well-formed values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrnUuid(Uuid);

impl UrnUuid {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UrnUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UrnUuid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for UrnUuid {
    type Err = UrnUuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < URN_UUID_PREFIX.len()
            || !s[..URN_UUID_PREFIX.len()].eq_ignore_ascii_case(URN_UUID_PREFIX)
        {
            return Err(UrnUuidError(s.to_string()));
        }

        let uuid = Uuid::parse_str(&s[URN_UUID_PREFIX.len()..])
            .map_err(|_| UrnUuidError(s.to_string()))?;
        Ok(Self(uuid))
    }
}

impl TryFrom<String> for UrnUuid {
    type Error = UrnUuidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UrnUuid> for String {
    fn from(val: UrnUuid) -> Self {
        val.to_string()
    }
}

impl std::fmt::Display for UrnUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", URN_UUID_PREFIX, self.0)
    }
}

impl Decode<'_, Sqlite> for UrnUuid {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Sqlite>>::decode(value)?;
        Ok(s.parse()?)
    }
}

impl Encode<'_, Sqlite> for UrnUuid {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.to_string().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for UrnUuid {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("not a valid urn:uuid identifier: {0}")]
pub struct UrnUuidError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_form() {
        let id: UrnUuid = "urn:uuid:0b9bb5ee-3187-4387-bb39-2c09536c79f7"
            .parse()
            .unwrap();
        assert_eq!(
            id.to_string(),
            "urn:uuid:0b9bb5ee-3187-4387-bb39-2c09536c79f7"
        );
    }

    #[test]
    fn accepts_uppercase_scheme() {
        assert!("URN:UUID:0b9bb5ee-3187-4387-bb39-2c09536c79f7"
            .parse::<UrnUuid>()
            .is_ok());
    }

    #[test]
    fn rejects_bare_uuid() {
        assert!("0b9bb5ee-3187-4387-bb39-2c09536c79f7"
            .parse::<UrnUuid>()
            .is_err());
    }

    #[test]
    fn rejects_wrong_namespace() {
        assert!("urn:nbn:0b9bb5ee-3187-4387-bb39-2c09536c79f7"
            .parse::<UrnUuid>()
            .is_err());
        assert!("urn:uuid:not-a-uuid".parse::<UrnUuid>().is_err());
    }
}
