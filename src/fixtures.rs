//! Sample car catalog and seeded data.
//!
//! Used by the command-line tool and by tests across the crate. The model is
//! small but has everything the compilers care about: inherited fields, a
//! single-valued relation, collections of related entities and an enum.

use crate::access::{EntityStore, NumericWidth, Record, Value};
use crate::catalog::{Catalog, EnumInfo, FieldType, TypeInfo};
use anyhow::Result;
use chrono::DateTime;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SCREW_TYPES: [&str; 4] = ["PHILLIPS", "FLAT", "TORX", "HEX"];

/// 2020-01-01T00:00:00Z
const BASE_MILLIS: i64 = 1_577_836_800_000;
const DAY_MILLIS: i64 = 86_400_000;

/// Car, Engine and Screw sharing a BaseEntity with an `id`
pub fn catalog() -> Result<Catalog> {
    Catalog::builder()
        .enumeration(EnumInfo::new("ScrewType", SCREW_TYPES))
        .entity(TypeInfo::new("BaseEntity").field("id", FieldType::Numeric(NumericWidth::Int64)))
        .entity(
            TypeInfo::new("Car")
                .extends("BaseEntity")
                .field("name", FieldType::String)
                .field("description", FieldType::String)
                .field("active", FieldType::Boolean)
                .field("mfgdt", FieldType::DateTime)
                .field("engine", FieldType::entity("Engine"))
                .field("screws", FieldType::list_of(FieldType::entity("Screw"))),
        )
        .entity(
            TypeInfo::new("Engine")
                .extends("BaseEntity")
                .field("name", FieldType::String)
                .field("description", FieldType::String)
                .field("screws", FieldType::list_of(FieldType::entity("Screw"))),
        )
        .entity(
            TypeInfo::new("Screw")
                .extends("BaseEntity")
                .field("name", FieldType::String)
                .field("size", FieldType::Numeric(NumericWidth::Int64))
                .field("description", FieldType::String)
                .field("screwType", FieldType::enumeration("ScrewType")),
        )
        .build()
}

/// Insert `count` cars with ids `1..=count`.
///
/// Names follow the id (`Car1`, `Car2`, ...); descriptions, screws and
/// dates come from a generator seeded with `seed`, so equal seeds give
/// equal data.
pub fn seed_cars(store: &EntityStore, count: u64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut next_screw_id = 1i64;

    for i in 1..=count {
        let id = i64::try_from(i).unwrap_or(i64::MAX);

        let engine = Record::new("Engine")
            .with("id", id)
            .with("name", format!("Engine{}", i))
            .with("description", format!("Description engine {}", rng.gen_range(1..=100)))
            .with("screws", screws(&mut rng, &mut next_screw_id));

        let mut car = Record::new("Car")
            .with("id", id)
            .with("name", format!("Car{}", i))
            .with("description", format!("Description car {}", rng.gen_range(1..=100)))
            .with("active", rng.gen_bool(0.5))
            .with("engine", engine)
            .with("screws", screws(&mut rng, &mut next_screw_id));

        let millis = BASE_MILLIS + rng.gen_range(0..3650) * DAY_MILLIS;
        if let Some(mfgdt) = DateTime::from_timestamp_millis(millis) {
            car.set("mfgdt", mfgdt.naive_utc());
        }

        store.insert(car);
    }

    debug!("Seeded {} cars (seed {})", count, seed);
}

fn screws(rng: &mut StdRng, next_id: &mut i64) -> Value {
    let count = rng.gen_range(1..=3);
    let items = (0..count)
        .map(|_| {
            let id = *next_id;
            *next_id += 1;
            let screw_type = SCREW_TYPES[rng.gen_range(0..SCREW_TYPES.len())];
            Value::Record(
                Record::new("Screw")
                    .with("id", id)
                    .with("name", format!("Screw name {}", rng.gen_range(1..=100)))
                    .with("size", rng.gen_range(1..=20i64))
                    .with("description", format!("Screw description {}", id))
                    .with("screwType", Value::Enum(screw_type.to_string())),
            )
        })
        .collect();
    Value::List(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeClass;

    #[test]
    fn test_catalog_shape() -> Result<()> {
        let catalog = catalog()?;
        let fields: Vec<&str> = catalog
            .all_fields("Car")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            fields,
            vec!["id", "name", "description", "active", "mfgdt", "engine", "screws"]
        );
        assert!(catalog.get_enum("ScrewType").is_some_and(|e| e.contains("TORX")));
        assert_eq!(
            FieldType::enumeration("ScrewType").classification(),
            TypeClass::Enum
        );
        Ok(())
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = EntityStore::new();
        let b = EntityStore::new();
        seed_cars(&a, 5, 42);
        seed_cars(&b, 5, 42);
        assert_eq!(a.scan("Car"), b.scan("Car"));
        assert_eq!(a.len("Car"), 5);
        // Only roots are stored; engines and screws are nested
        assert!(a.is_empty("Engine"));
    }

    #[test]
    fn test_seeded_record_contents() {
        let store = EntityStore::new();
        seed_cars(&store, 3, 7);
        let cars = store.scan("Car");

        assert_eq!(cars[2].get("name"), &Value::from("Car3"));
        assert!(matches!(cars[0].get("mfgdt"), Value::DateTime(_)));
        assert!(matches!(cars[0].get("active"), Value::Boolean(_)));

        let Value::Record(engine) = cars[1].get("engine") else {
            panic!("engine should be a nested record");
        };
        assert!(matches!(engine.get("screws"), Value::List(items) if !items.is_empty()));
        assert!(cars[0]
            .get("description")
            .as_str()
            .is_some_and(|d| d.starts_with("Description car ")));
    }
}
