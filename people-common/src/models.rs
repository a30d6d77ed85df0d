//! Person models
//!
//! `Person` is the domain/wire form handled by the service and HTTP layer.
//! `PersonRecord` is the storage form, where the patronymic is nullable so
//! that "not recorded" is a column NULL rather than an empty string.

use serde::{Deserialize, Deserializer, Serialize};

/// Person in domain form
///
/// `id == 0` means the person has not been persisted yet. An empty
/// `patronymic` means none was recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub surname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub patronymic: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nation: String,
}

/// Person in storage form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: u64,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub age: u32,
    pub gender: String,
    pub nation: String,
}

impl From<Person> for PersonRecord {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            surname: person.surname,
            patronymic: Some(person.patronymic).filter(|p| !p.is_empty()),
            age: person.age,
            gender: person.gender,
            nation: person.nation,
        }
    }
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            surname: record.surname,
            patronymic: record.patronymic.unwrap_or_default(),
            age: record.age,
            gender: record.gender,
            nation: record.nation,
        }
    }
}

/// Decode JSON `null` as the type's default value.
///
/// Shared with the enrichment payloads, where the inference services answer
/// `null` for names they have no data on.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Person {
        Person {
            id: 7,
            name: "Dmitriy".to_string(),
            surname: "Ushakov".to_string(),
            patronymic: "Vasilevich".to_string(),
            age: 42,
            gender: "male".to_string(),
            nation: "RU".to_string(),
        }
    }

    #[test]
    fn test_round_trip_with_patronymic() {
        let person = sample();
        let record = PersonRecord::from(person.clone());
        assert_eq!(record.patronymic.as_deref(), Some("Vasilevich"));
        assert_eq!(Person::from(record), person);
    }

    #[test]
    fn test_empty_patronymic_maps_to_absent() {
        let person = Person {
            patronymic: String::new(),
            ..sample()
        };
        let record = PersonRecord::from(person.clone());
        assert_eq!(record.patronymic, None);

        let back = Person::from(record);
        assert_eq!(back.patronymic, "");
        assert_eq!(back, person);
    }

    #[test]
    fn test_absent_patronymic_round_trips_through_domain() {
        let record = PersonRecord {
            patronymic: None,
            ..PersonRecord::from(sample())
        };
        assert_eq!(PersonRecord::from(Person::from(record.clone())), record);
    }

    #[test]
    fn test_sparse_json_uses_defaults() {
        let person: Person =
            serde_json::from_str(r#"{"name":"Alice","surname":"Smith"}"#).unwrap();
        assert_eq!(person.name, "Alice");
        assert_eq!(person.surname, "Smith");
        assert_eq!(person.id, 0);
        assert_eq!(person.age, 0);
        assert!(person.patronymic.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let person: Person =
            serde_json::from_str(r#"{"name":"Alice","patronymic":null,"age":null}"#).unwrap();
        assert_eq!(person.patronymic, "");
        assert_eq!(person.age, 0);
    }

    #[test]
    fn test_serializes_lowercase_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        for key in ["id", "name", "surname", "patronymic", "age", "gender", "nation"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }
}
