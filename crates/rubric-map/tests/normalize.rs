use proptest::prelude::*;
use rubric_map::{MappingHintStore, apply_mapping, ensure_canonical_columns, suggest_mapping};
use rubric_model::{CANONICAL_COLUMNS, MappingConfig, RawTable};
use tempfile::TempDir;

fn identifier() -> impl Strategy<Value = String> {
    "[ ]{0,2}[A-Za-z0-9]{1,6}( [A-Za-z]{1,4})?[ ]{0,2}"
}

fn points() -> impl Strategy<Value = String> {
    (0u32..1000, 0u32..4).prop_map(|(whole, frac)| match frac {
        0 => whole.to_string(),
        f => format!("{whole}.{}", f * 25),
    })
}

fn canonical_raw() -> impl Strategy<Value = RawTable> {
    prop::collection::vec(
        (
            identifier(),
            identifier(),
            identifier(),
            identifier(),
            points(),
            prop::option::of(identifier()),
        ),
        0..20,
    )
    .prop_map(|rows| {
        RawTable::from_rows(
            &CANONICAL_COLUMNS,
            rows.into_iter().map(|(s, e, q, r, p, t)| {
                vec![s, e, q, r, p, t.unwrap_or_default(), String::new(), String::new()]
            }),
        )
    })
}

proptest! {
    #[test]
    fn ensure_canonical_columns_is_idempotent(raw in canonical_raw()) {
        let once = ensure_canonical_columns(&raw).unwrap();
        let twice = ensure_canonical_columns(&once.to_raw()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn mapped_table_round_trips_through_canonical(raw in canonical_raw()) {
        let renamed = RawTable {
            headers: raw.headers.iter().map(|h| format!("Src {h}")).collect(),
            rows: raw.rows.clone(),
        };
        let selection = CANONICAL_COLUMNS
            .iter()
            .zip(&renamed.headers)
            .map(|(field, header)| (field.parse().unwrap(), Some(header.clone())))
            .collect();
        let mapping = MappingConfig::from_selection(&selection).unwrap();

        let mapped = apply_mapping(&renamed, &mapping).unwrap();
        let direct = ensure_canonical_columns(&raw).unwrap();
        prop_assert_eq!(&mapped, &direct);
        prop_assert_eq!(ensure_canonical_columns(&mapped.to_raw()).unwrap(), mapped);
    }
}

#[test]
fn hint_is_reused_only_when_columns_exist() {
    let dir = TempDir::new().unwrap();
    let store = MappingHintStore::new(dir.path().join("hints").join("last_mapping.json"));
    assert!(store.load().unwrap().is_none());

    let table = RawTable::from_rows(
        &["Student ID", "Exam", "Question", "Rubric", "Points"],
        [["s1", "E1", "Q1", "A", "1"]],
    );
    let mapping = MappingConfig::from_selection(&suggest_mapping(&table)).unwrap();
    let saved = store.save(&mapping).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(store.load_for(&table).unwrap(), Some(mapping));

    let other = RawTable::from_rows(&["Student ID", "Exam"], [["s1", "E1"]]);
    assert_eq!(store.load_for(&other).unwrap(), None);
}
