use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use uuid::Uuid;

/// Identifier of a sealed tar, stored as hyphenated text.
///
/// Tar ids are plain uuids minted by the transfer process when it seals a
/// container; unlike bag ids they carry no `urn:` scheme. A distinct type
/// keeps the two id spaces from mixing in queries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TarId(Uuid);

impl TarId {
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TarId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TarId> for Uuid {
    fn from(id: TarId) -> Self {
        id.0
    }
}

impl FromStr for TarId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for TarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl Decode<'_, Sqlite> for TarId {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Sqlite>>::decode(value)?;
        Ok(s.parse()?)
    }
}

impl Encode<'_, Sqlite> for TarId {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.to_string().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for TarId {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_hyphenated_text() {
        let id: TarId = "8d7f5a2a-91c6-4b5e-8f5e-000000000001".parse().unwrap();
        assert_eq!(id.to_string(), "8d7f5a2a-91c6-4b5e-8f5e-000000000001");
    }

    #[test]
    fn round_trips_through_uuid() {
        let uuid = Uuid::new_v4();
        let id = TarId::from(uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn rejects_non_uuid_text() {
        assert!("tar-0001".parse::<TarId>().is_err());
    }
}
