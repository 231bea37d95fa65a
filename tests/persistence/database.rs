use minisql_engine::EngineError;
use minisql_engine::persistence::{Database, Row};

fn _prepare_database() -> Database {
    Database::new()
}

fn _create_table(database: &mut Database, name: &str, columns: Vec<&str>, data: Vec<Vec<(&str, &str)>>) {
    database
        .create_table(name, columns.iter().map(|c| c.to_string()).collect())
        .expect("invalid column definitions or table exists already");

    let table = database.get_table_mut(name).unwrap();
    for row in data {
        table.insert(Row::from_pairs(row));
    }
}

#[test]
fn database_create_table() {
    let mut database = _prepare_database();
    let values = vec![
        vec![("id", "1"), ("name", "Jansen")],
        vec![("id", "2"), ("name", "Bonega")],
        vec![("id", "3"), ("name", "Maharashtra")],
    ];

    _create_table(&mut database, "test_tb1", vec!["id", "name"], values);

    assert!(database.contains_table("test_tb1"));
    assert_eq!(database.get_table("test_tb1").unwrap().len(), 3);
}

#[test]
fn database_create_table_twice_fails() {
    let mut database = _prepare_database();
    _create_table(&mut database, "test_tb1", vec!["id"], vec![]);

    let result = database.create_table("test_tb1", vec!["id".to_string()]);
    assert!(matches!(result, Err(EngineError::TableExists(name)) if name == "test_tb1"));

    assert!(!database
        .create_table_if_not_exists("test_tb1", vec!["other".to_string()])
        .unwrap());
    assert_eq!(database.get_table("test_tb1").unwrap().columns(), vec!["id"]);
}

#[test]
fn database_missing_table() {
    let mut database = _prepare_database();

    assert!(matches!(
        database.get_table("nope"),
        Err(EngineError::TableNotFound(_))
    ));
    assert!(matches!(
        database.drop_table("nope"),
        Err(EngineError::TableNotFound(_))
    ));
    assert!(!database.drop_table_if_exists("nope"));
}

#[test]
fn database_table_names_keep_creation_order() {
    let mut database = _prepare_database();
    for name in ["zeta", "alpha", "mid"] {
        _create_table(&mut database, name, vec!["id"], vec![]);
    }

    assert_eq!(database.table_names(), vec!["zeta", "alpha", "mid"]);

    let dropped = database.drop_table("alpha").unwrap();
    assert_eq!(dropped.name(), "alpha");
    assert_eq!(database.table_names(), vec!["zeta", "mid"]);
}
