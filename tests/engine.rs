use minisql_engine::{Engine, EngineError};

fn _users() -> Engine {
    let mut engine = Engine::new();
    engine.create_table("users", &["id", "name", "age"]).unwrap();

    engine
        .execute("INSERT INTO users (id, name, age) VALUES (1, 'Alice', 30);")
        .unwrap();
    engine
        .execute("INSERT INTO users (id, name, age) VALUES (2, 'Bob', 25);")
        .unwrap();
    engine
        .execute("INSERT INTO users (id, name, age) VALUES (3, 'Charlie', 35);")
        .unwrap();

    engine
}

fn _names(engine: &mut Engine, sql: &str) -> Vec<String> {
    engine
        .query(sql)
        .unwrap()
        .column_values("name")
        .into_iter()
        .map(|name| name.unwrap_or("NULL").to_string())
        .collect()
}

#[test]
fn insert_then_select_returns_rows() {
    let mut engine = _users();
    let rows = engine.query("SELECT * FROM users;").unwrap();

    assert_eq!(rows.columns, vec!["id", "name", "age"]);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.get(0, "name"), Some("Alice"));
    assert_eq!(rows.get(2, "age"), Some("35"));
}

#[test]
fn select_where_with_order_by() {
    let mut engine = _users();

    assert_eq!(
        _names(&mut engine, "SELECT * FROM users WHERE age > 25 ORDER BY name DESC;"),
        vec!["Charlie", "Alice"]
    );
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE age >= 30 ORDER BY age"),
        vec!["Alice", "Charlie"]
    );
}

#[test]
fn select_projects_and_aliases() {
    let mut engine = _users();
    let rows = engine
        .query("SELECT name AS who, id FROM users WHERE id = 2")
        .unwrap();

    assert_eq!(rows.columns, vec!["who", "id"]);
    assert_eq!(rows.get(0, "who"), Some("Bob"));
    assert_eq!(rows.get(0, "age"), None);
}

#[test]
fn update_then_select_reflects_new_values() {
    let mut engine = _users();

    let result = engine.execute("UPDATE users SET age=40 WHERE id=1;").unwrap();
    assert_eq!(result.n_rows_processed, 1);
    assert!(result.rows.is_none());

    let rows = engine.query("SELECT age FROM users ORDER BY id").unwrap();
    assert_eq!(rows.column_values("age"), vec![Some("40"), Some("25"), Some("35")]);
}

#[test]
fn update_without_where_touches_every_row() {
    let mut engine = _users();

    let result = engine.execute("UPDATE users SET age = 1").unwrap();
    assert_eq!(result.n_rows_processed, 3);
    assert_eq!(engine.query("SELECT * FROM users WHERE age = 1").unwrap().len(), 3);
}

#[test]
fn delete_removes_matching_rows() {
    let mut engine = _users();

    let result = engine.execute("DELETE FROM users WHERE age < 30;").unwrap();
    assert_eq!(result.n_rows_processed, 1);
    assert_eq!(_names(&mut engine, "SELECT name FROM users"), vec!["Alice", "Charlie"]);

    let result = engine.execute("DELETE FROM users").unwrap();
    assert_eq!(result.n_rows_processed, 2);
    assert!(engine.query("SELECT * FROM users").unwrap().is_empty());
}

#[test]
fn empty_table_is_a_valid_target() {
    let mut engine = Engine::new();
    engine.create_table("empty", &["id"]).unwrap();

    assert!(engine.query("SELECT * FROM empty").unwrap().is_empty());
    assert_eq!(engine.execute("UPDATE empty SET id = 1").unwrap().n_rows_processed, 0);
    assert_eq!(engine.execute("DELETE FROM empty").unwrap().n_rows_processed, 0);
}

#[test]
fn where_logic_combines() {
    let mut engine = _users();

    assert_eq!(
        _names(
            &mut engine,
            "SELECT name FROM users WHERE (age < 30 OR name = 'Charlie') AND id != 3"
        ),
        vec!["Bob"]
    );
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE NOT age = 30"),
        vec!["Bob", "Charlie"]
    );
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE age <> 30 AND age <= 25"),
        vec!["Bob"]
    );
}

#[test]
fn numeric_values_order_numerically() {
    let mut engine = Engine::new();
    engine.create_table("nums", &["n"]).unwrap();
    engine
        .execute("INSERT INTO nums VALUES (10), (9), (100), (-1)")
        .unwrap();

    let rows = engine.query("SELECT n FROM nums ORDER BY n").unwrap();
    assert_eq!(
        rows.column_values("n"),
        vec![Some("-1"), Some("9"), Some("10"), Some("100")]
    );

    assert_eq!(engine.query("SELECT n FROM nums WHERE n > 9").unwrap().len(), 2);
}

#[test]
fn limit_and_offset_cut_ordered_rows() {
    let mut engine = _users();

    assert_eq!(
        _names(&mut engine, "SELECT name FROM users ORDER BY age LIMIT 2"),
        vec!["Bob", "Alice"]
    );
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users ORDER BY age LIMIT 1 OFFSET 1"),
        vec!["Alice"]
    );
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users ORDER BY age LIMIT 2, 5"),
        vec!["Charlie"]
    );
}

#[test]
fn null_values_are_absent() {
    let mut engine = _users();
    engine
        .execute("INSERT INTO users (id, name, age) VALUES (4, 'Dora', NULL)")
        .unwrap();

    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE age IS NULL"),
        vec!["Dora"]
    );
    assert_eq!(
        engine.query("SELECT * FROM users WHERE age IS NOT NULL").unwrap().len(),
        3
    );
    // absent values sort first
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users ORDER BY age LIMIT 1"),
        vec!["Dora"]
    );
}

#[test]
fn aggregates_fold_filtered_rows() {
    let mut engine = _users();
    let rows = engine
        .query("SELECT COUNT(*), MIN(age), MAX(name) AS top_name FROM users WHERE id > 1")
        .unwrap();

    assert_eq!(rows.columns, vec!["COUNT(*)", "MIN(age)", "top_name"]);
    assert_eq!(rows.get(0, "COUNT(*)"), Some("2"));
    assert_eq!(rows.get(0, "MIN(age)"), Some("25"));
    assert_eq!(rows.get(0, "top_name"), Some("Charlie"));

    let rows = engine.query("SELECT MAX(age) FROM users WHERE id > 10").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get(0, "MAX(age)"), None);
}

#[test]
fn insert_without_column_list_uses_table_columns() {
    let mut engine = _users();
    let result = engine
        .execute("INSERT INTO users VALUES (4, 'Dora', 41), (5, 'Eve', 22)")
        .unwrap();

    assert_eq!(result.n_rows_processed, 2);
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE id >= 4"),
        vec!["Dora", "Eve"]
    );
}

#[test]
fn insert_with_new_column_extends_table() {
    let mut engine = _users();
    engine
        .execute("INSERT INTO users (id, name, email) VALUES (4, 'Dora', 'dora@example.com')")
        .unwrap();

    let rows = engine.query("SELECT * FROM users").unwrap();
    assert_eq!(rows.columns, vec!["id", "name", "age", "email"]);
    assert_eq!(rows.get(3, "email"), Some("dora@example.com"));
    assert_eq!(rows.get(0, "email"), None);
}

#[test]
fn ddl_statements() {
    let mut engine = Engine::new();
    engine
        .execute("CREATE TABLE pets (id INT, name VARCHAR(20))")
        .unwrap();
    engine
        .execute("CREATE TABLE IF NOT EXISTS pets (other INT)")
        .unwrap();

    let tables = engine.query("SHOW TABLES").unwrap();
    assert_eq!(tables.column_values("table"), vec![Some("pets")]);
    assert_eq!(engine.database().get_table("pets").unwrap().columns(), vec!["id", "name"]);

    engine.execute("DROP TABLE pets").unwrap();
    assert!(engine.query("SHOW TABLES").unwrap().is_empty());
    assert!(engine.execute("DROP TABLE IF EXISTS pets").is_ok());
}

#[test]
fn batch_stops_at_first_error() {
    let mut engine = Engine::new();
    let result = engine.execute_batch(
        "CREATE TABLE t (id INT); INSERT INTO t VALUES (1); SELECT * FROM missing; INSERT INTO t VALUES (2);",
    );

    assert!(matches!(result, Err(EngineError::TableNotFound(name)) if name == "missing"));
    assert_eq!(engine.database().get_table("t").unwrap().len(), 1);
}

#[test]
fn batch_returns_every_result() {
    let mut engine = Engine::new();
    let results = engine
        .execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1), (2); SELECT * FROM t;")
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[1].n_rows_processed, 2);
    assert_eq!(results[2].rows.as_ref().unwrap().len(), 2);
}

#[test]
fn errors_are_reported() {
    let mut engine = _users();

    assert!(matches!(
        engine.execute("SELECT * FROM nope"),
        Err(EngineError::TableNotFound(_))
    ));
    assert!(matches!(
        engine.create_table("users", &["id"]),
        Err(EngineError::TableExists(_))
    ));
    assert!(matches!(
        engine.execute("SELECT height FROM users"),
        Err(EngineError::UnknownColumn { column, .. }) if column == "height"
    ));
    assert!(matches!(
        engine.execute("DELETE FROM users WHERE height > 2"),
        Err(EngineError::UnknownColumn { .. })
    ));
    assert!(matches!(
        engine.execute("INSERT INTO users (id, name) VALUES (1)"),
        Err(EngineError::ColumnCountMismatch { columns: 2, values: 1 })
    ));
    assert!(matches!(
        engine.execute("SELECT * FROM users u JOIN users v ON u.id = v.id"),
        Err(EngineError::Unsupported(_))
    ));
    assert!(matches!(
        engine.execute("SELEC * FROM users"),
        Err(EngineError::Parse(_))
    ));
    assert!(matches!(
        engine.query("DELETE FROM users WHERE id = 99"),
        Err(EngineError::Invalid(_))
    ));
}

#[test]
fn failed_insert_leaves_table_untouched() {
    let mut engine = _users();

    let result = engine.execute("INSERT INTO users (id, name) VALUES (4, 'Dora'), (5)");
    assert!(result.is_err());
    assert_eq!(engine.query("SELECT * FROM users").unwrap().len(), 3);
}

#[test]
fn result_set_renders_as_json() {
    let mut engine = _users();
    engine
        .execute("INSERT INTO users (id, name) VALUES (4, 'Dora')")
        .unwrap();

    let rows = engine.query("SELECT name, age FROM users WHERE id = 4").unwrap();
    assert_eq!(
        serde_json::to_string(&rows).unwrap(),
        r#"[{"name":"Dora","age":null}]"#
    );
}

#[test]
fn result_set_renders_as_grid() {
    let mut engine = _users();
    let rows = engine.query("SELECT id, name FROM users WHERE id = 2").unwrap();

    assert_eq!(
        rows.to_string(),
        "+----+------+\n| id | name |\n+----+------+\n| 2  | Bob  |\n+----+------+"
    );
}

#[test]
fn unsupported_delete_and_update_clauses_change_nothing() {
    let mut engine = _users();

    for sql in [
        "DELETE FROM users LIMIT 1",
        "DELETE FROM users ORDER BY id",
        "UPDATE users SET age = 1 LIMIT 1",
    ] {
        assert!(
            matches!(engine.execute(sql), Err(EngineError::Unsupported(_))),
            "{} should be rejected",
            sql
        );
    }

    let rows = engine.query("SELECT age FROM users").unwrap();
    assert_eq!(rows.column_values("age"), vec![Some("30"), Some("25"), Some("35")]);
}

#[test]
fn unsupported_select_clauses_are_rejected() {
    let mut engine = _users();
    engine
        .execute("INSERT INTO users (id, name, age) VALUES (4, 'Alice', 50)")
        .unwrap();

    for sql in [
        "SELECT DISTINCT name FROM users",
        "SELECT name FROM users GROUP BY name",
        "SELECT COUNT(*) FROM users HAVING COUNT(*) > 10",
        "SELECT COUNT(DISTINCT name) FROM users",
        "SELECT name FROM users UNION SELECT name FROM users",
        "WITH u AS (SELECT * FROM users) SELECT * FROM u",
    ] {
        assert!(
            matches!(engine.execute(sql), Err(EngineError::Unsupported(_))),
            "{} should be rejected",
            sql
        );
    }
}

#[test]
fn insert_registers_columns_given_null() {
    let mut engine = _users();
    engine
        .execute("INSERT INTO users (id, email) VALUES (4, NULL)")
        .unwrap();

    assert_eq!(
        engine.database().get_table("users").unwrap().columns(),
        vec!["id", "name", "age", "email"]
    );
    let rows = engine.query("SELECT email FROM users WHERE id = 4").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get(0, "email"), None);
}

#[test]
fn duplicate_output_labels_are_rejected() {
    let mut engine = _users();

    assert!(matches!(
        engine.execute("SELECT name AS x, age AS x FROM users"),
        Err(EngineError::DuplicateColumn(label)) if label == "x"
    ));
    assert!(matches!(
        engine.execute("SELECT COUNT(*), COUNT(*) FROM users"),
        Err(EngineError::DuplicateColumn(_))
    ));
}

#[test]
fn double_negation_stays_numeric() {
    let mut engine = _users();
    engine
        .execute("INSERT INTO users (id, name, age) VALUES (9, 'Neg', - -5)")
        .unwrap();

    let rows = engine.query("SELECT age FROM users WHERE id = 9").unwrap();
    assert_eq!(rows.get(0, "age"), Some("5"));
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE age < 10"),
        vec!["Neg"]
    );
}

#[test]
fn update_to_null_clears_the_value() {
    let mut engine = _users();

    let result = engine.execute("UPDATE users SET age = NULL WHERE id = 2").unwrap();
    assert_eq!(result.n_rows_processed, 1);
    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE age IS NULL"),
        vec!["Bob"]
    );
}

#[test]
fn update_with_new_column_extends_table() {
    let mut engine = _users();
    engine
        .execute("UPDATE users SET email = 'bob@example.com' WHERE id = 2")
        .unwrap();

    let rows = engine.query("SELECT * FROM users").unwrap();
    assert_eq!(rows.columns, vec!["id", "name", "age", "email"]);
    assert_eq!(
        rows.column_values("email"),
        vec![None, Some("bob@example.com"), None]
    );
}

#[test]
fn not_over_absent_value_is_true() {
    let mut engine = _users();
    engine
        .execute("INSERT INTO users (id, name) VALUES (4, 'Dora')")
        .unwrap();

    assert_eq!(
        _names(&mut engine, "SELECT name FROM users WHERE NOT age > 26"),
        vec!["Bob", "Dora"]
    );
}

#[test]
fn min_and_max_need_a_column() {
    let mut engine = _users();

    assert!(matches!(
        engine.execute("SELECT MIN(*) FROM users"),
        Err(EngineError::Invalid(_))
    ));
    assert!(matches!(
        engine.execute("SELECT MAX(*) FROM users"),
        Err(EngineError::Invalid(_))
    ));
}

#[test]
fn order_by_accepts_select_alias() {
    let mut engine = _users();

    let rows = engine
        .query("SELECT name, age AS years FROM users ORDER BY years DESC")
        .unwrap();
    assert_eq!(rows.columns, vec!["name", "years"]);
    assert_eq!(
        rows.column_values("name"),
        vec![Some("Charlie"), Some("Alice"), Some("Bob")]
    );
}
