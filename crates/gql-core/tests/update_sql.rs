//! End-to-end UPDATE compilation through `Dataset::update_sql`.

use std::collections::{BTreeMap, HashMap};

use gql_core::builder::{i, literal, SqlValue, Valuer};
use gql_core::{from, BoxError, GqlError, Record};

#[derive(Record)]
struct Item {
    #[db(name = "address")]
    address: String,
    #[db(name = "name")]
    name: String,
}

fn item() -> Item {
    Item {
        name: String::from("Test"),
        address: String::from("111 Test Addr"),
    }
}

fn item_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([("name", "Test"), ("address", "111 Test Addr")])
}

// =============================================================================
// Payload shapes
// =============================================================================

#[test]
fn test_update_sql_with_structs() {
    let sql = from("items").update_sql(&item()).unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test'"#
    );
}

#[test]
fn test_update_sql_with_maps() {
    let sql = from("items").update_sql(&item_map()).unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test'"#
    );
}

#[test]
fn test_map_order_does_not_depend_on_insertion() {
    let forward: BTreeMap<String, i64> = (0..10).map(|n| (format!("c{n}"), n)).collect();
    let mut backward: HashMap<String, i64> = HashMap::new();
    for n in (0..10).rev() {
        backward.insert(format!("c{n}"), n);
    }

    let ds = from("items");
    assert_eq!(
        ds.update_sql(&forward).unwrap(),
        ds.update_sql(&backward).unwrap()
    );
}

#[test]
fn test_update_sql_with_byte_slice() {
    #[derive(Record)]
    struct Blob {
        #[db(name = "name")]
        name: String,
        #[db(name = "data")]
        data: Vec<u8>,
    }

    let sql = from("items")
        .returning([i("items").all()])
        .update_sql(&Blob {
            name: String::from("Test"),
            data: br#"{"someJson":"data"}"#.to_vec(),
        })
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "data"='{"someJson":"data"}',"name"='Test' RETURNING "items".*"#
    );
}

struct Greeting(Vec<u8>);

impl Valuer for Greeting {
    fn value(&self) -> Result<SqlValue, BoxError> {
        Ok(SqlValue::Blob(
            format!("{} World", String::from_utf8_lossy(&self.0)).into_bytes(),
        ))
    }
}

#[test]
fn test_update_sql_with_valuer() {
    #[derive(Record)]
    struct WithValuer {
        #[db(name = "name")]
        name: String,
        #[db(name = "data")]
        data: Greeting,
    }

    let sql = from("items")
        .returning([i("items").all()])
        .update_sql(&WithValuer {
            name: String::from("Test"),
            data: Greeting(b"Hello".to_vec()),
        })
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "data"='Hello World',"name"='Test' RETURNING "items".*"#
    );
}

struct Rejecting;

impl Valuer for Rejecting {
    fn value(&self) -> Result<SqlValue, BoxError> {
        Err("gql: cannot store rejected value".into())
    }
}

#[test]
fn test_update_sql_with_failing_valuer() {
    #[derive(Record)]
    struct WithFailure {
        name: String,
        data: Rejecting,
    }

    let err = from("items")
        .update_sql(&WithFailure {
            name: String::from("Test"),
            data: Rejecting,
        })
        .unwrap_err();
    assert!(matches!(err, GqlError::Encode { ref column, .. } if column == "data"));
    assert_eq!(err.to_string(), "gql: cannot store rejected value");
}

#[test]
fn test_update_sql_with_unsupported_type() {
    let err = from("items")
        .update_sql(&vec![String::from("HELLO")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "gql: Unsupported update interface type []string"
    );
}

#[test]
fn test_update_sql_with_skip_update_tag() {
    #[allow(dead_code)]
    #[derive(Record)]
    struct Skipped {
        #[db(name = "address")]
        #[gql(skip_update)]
        address: String,
        #[db(name = "name")]
        name: String,
    }

    let sql = from("items")
        .update_sql(&Skipped {
            name: String::from("Test"),
            address: String::from("111 Test Addr"),
        })
        .unwrap();
    assert_eq!(sql, r#"UPDATE "items" SET "name"='Test'"#);
}

#[test]
fn test_update_sql_with_only_skipped_fields() {
    #[allow(dead_code)]
    #[derive(Record)]
    struct AllSkipped {
        #[gql(skip_update)]
        id: i64,
    }

    let sql = from("items").update_sql(&AllSkipped { id: 1 }).unwrap();
    assert_eq!(sql, r#"UPDATE "items" SET "#);
}

// =============================================================================
// Clauses
// =============================================================================

#[test]
fn test_update_sql_with_where() {
    let ds = from("items");

    let sql = ds
        .where_clause(i("name").is_null())
        .update_sql(&item())
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test' WHERE ("name" IS NULL)"#
    );

    let sql = ds
        .where_clause(i("name").is_null())
        .update_sql(&item_map())
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test' WHERE ("name" IS NULL)"#
    );
}

#[test]
fn test_update_sql_with_returning() {
    let ds = from("items");

    let sql = ds
        .returning([i("items").all()])
        .update_sql(&item())
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test' RETURNING "items".*"#
    );

    let sql = ds
        .where_clause(i("name").is_null())
        .returning([literal(r#""items".*"#)])
        .update_sql(&item_map())
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test' WHERE ("name" IS NULL) RETURNING "items".*"#
    );
}

#[test]
fn test_update_sql_with_compound_where() {
    let sql = from("items")
        .where_clause(i("name").is_null())
        .where_clause(i("id").in_list([1, 2, 3]))
        .update_sql(&item_map())
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "items" SET "address"='111 Test Addr',"name"='Test' WHERE (("name" IS NULL) AND ("id" IN (1, 2, 3)))"#
    );
}

#[test]
fn test_base_dataset_is_reusable_across_threads() {
    let base = from("items").where_clause(i("name").is_null());
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let ds = base.clone();
            std::thread::spawn(move || {
                ds.update_sql(&BTreeMap::from([("n", n)])).unwrap()
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!(r#"UPDATE "items" SET "n"={n} WHERE ("name" IS NULL)"#)
        );
    }
    assert_eq!(base, from("items").where_clause(i("name").is_null()));
}

#[test]
fn test_compile_is_idempotent() {
    let ds = from("items")
        .where_clause(i("name").is_null())
        .returning([i("items").all()]);
    let payload = item_map();
    assert_eq!(
        ds.update_sql(&payload).unwrap(),
        ds.update_sql(&payload).unwrap()
    );
}
