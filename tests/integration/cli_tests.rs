//! CLI integration tests
//!
//! Tests for the sqltidy command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sqltidy() -> Command {
    Command::cargo_bin("sqltidy").unwrap()
}

mod fmt_command {
    use super::*;

    #[test]
    fn fmt_single_file_to_stdout() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("query.sql");
        fs::write(&file_path, "select id, name from users").unwrap();

        sqltidy()
            .arg("fmt")
            .arg(&file_path)
            .assert()
            .success()
            .stdout("SELECT id,\n       name\nFROM users\n");
    }

    #[test]
    fn fmt_single_file_in_place() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("query.sql");
        fs::write(&file_path, "select a.id from a").unwrap();

        sqltidy()
            .arg("fmt")
            .arg("--write")
            .arg("--aliases")
            .arg(&file_path)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "SELECT a.id AS a_id\nFROM a\n");
    }

    #[test]
    fn fmt_directory_skips_other_files() {
        let temp = TempDir::new().unwrap();
        let sql_file = temp.path().join("q.sql");
        let txt_file = temp.path().join("notes.txt");
        fs::write(&sql_file, "select 1").unwrap();
        fs::write(&txt_file, "select 1").unwrap();

        sqltidy()
            .arg("fmt")
            .arg("-w")
            .arg(temp.path())
            .assert()
            .success();

        assert_eq!(fs::read_to_string(&sql_file).unwrap(), "SELECT 1\n");
        assert_eq!(fs::read_to_string(&txt_file).unwrap(), "select 1");
    }

    #[test]
    fn fmt_glob_pattern() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.sql"), "select a from t").unwrap();
        fs::write(temp.path().join("b.sql"), "select b from t").unwrap();
        let pattern = temp.path().join("*.sql");

        sqltidy()
            .arg("fmt")
            .arg(&pattern)
            .assert()
            .success()
            .stdout(predicate::str::contains("SELECT a\nFROM t"))
            .stdout(predicate::str::contains("SELECT b\nFROM t"));
    }

    #[test]
    fn fmt_from_stdin_with_aliases() {
        sqltidy()
            .arg("fmt")
            .arg("-a")
            .arg("-")
            .write_stdin("SELECT a.id, b.name, COUNT(*) FROM a JOIN b ON a.id=b.id")
            .assert()
            .success()
            .stdout(predicate::str::contains("SELECT a.id AS a_id,"))
            .stdout(predicate::str::contains("       b.name AS b_name,"))
            .stdout(predicate::str::contains("JOIN b ON a.id = b.id"));
    }

    #[test]
    fn fmt_empty_stdin_exits_with_code_2() {
        sqltidy()
            .arg("fmt")
            .arg("-")
            .write_stdin("  \n")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("No SQL provided"));
    }

    #[test]
    fn fmt_parse_error_shows_location() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("invalid.sql");
        fs::write(&file_path, "select a\nfrom 'open").unwrap();

        sqltidy()
            .arg("fmt")
            .arg(&file_path)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("line 2, column 6"))
            .stderr(predicate::str::contains("Unterminated string literal"));
    }

    #[test]
    fn fmt_missing_file_exits_with_code_2() {
        sqltidy()
            .arg("fmt")
            .arg("/nonexistent/path/file.sql")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("no SQL files found"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_already_formatted_exits_0() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("ok.sql");
        fs::write(&file_path, "SELECT a\nFROM t\n").unwrap();

        sqltidy().arg("check").arg(&file_path).assert().success();
    }

    #[test]
    fn check_needs_formatting_exits_1() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("messy.sql");
        fs::write(&file_path, "select a from t").unwrap();

        sqltidy()
            .arg("check")
            .arg(&file_path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("needs formatting"));
    }

    #[test]
    fn check_with_aliases_expects_aliased_form() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("plain.sql");
        fs::write(&file_path, "SELECT a.id\nFROM a\n").unwrap();

        sqltidy().arg("check").arg(&file_path).assert().success();
        sqltidy()
            .arg("check")
            .arg("--aliases")
            .arg(&file_path)
            .assert()
            .code(1);
    }

    #[test]
    fn check_parse_error_exits_2() {
        sqltidy()
            .arg("check")
            .arg("-")
            .write_stdin("select (a from t")
            .assert()
            .code(2);
    }
}

mod request_command {
    use super::*;

    #[test]
    fn request_from_stdin() {
        sqltidy()
            .arg("request")
            .write_stdin(r#"{"sql": "select a.x from a", "add_aliases": true}"#)
            .assert()
            .success()
            .stdout("{\"formatted_sql\":\"SELECT a.x AS a_x\\nFROM a\"}\n");
    }

    #[test]
    fn request_from_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("body.json");
        fs::write(&file_path, r#"{"sql": "select 1"}"#).unwrap();

        sqltidy()
            .arg("request")
            .arg(&file_path)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""formatted_sql":"SELECT 1""#));
    }

    #[test]
    fn request_without_sql_exits_1() {
        sqltidy()
            .arg("request")
            .write_stdin(r#"{"add_aliases": true}"#)
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#"{"error":"No SQL provided"}"#));
    }

    #[test]
    fn request_with_empty_object_exits_1() {
        sqltidy()
            .arg("request")
            .write_stdin("{}")
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#"{"error":"No data provided"}"#));
    }

    #[test]
    fn request_that_fails_to_format_exits_2() {
        sqltidy()
            .arg("request")
            .write_stdin(r#"{"sql": "select a) from t"}"#)
            .assert()
            .code(2)
            .stdout(predicate::str::contains("Unbalanced closing parenthesis"));
    }
}

mod cli_options {
    use super::*;

    #[test]
    fn help_flag() {
        sqltidy()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("fmt"))
            .stdout(predicate::str::contains("check"))
            .stdout(predicate::str::contains("request"));
    }

    #[test]
    fn version_flag() {
        sqltidy()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("sqltidy"));
    }

    #[test]
    fn missing_file_argument() {
        sqltidy().arg("fmt").assert().failure();
    }
}
