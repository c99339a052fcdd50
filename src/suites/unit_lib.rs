//! Unit suite for the demo library

use anyhow::ensure;
use serde_json::{json, Value};

use crate::demo::library::{add_to_hello_string, add_to_one, return_hello_string, return_one};
use crate::models::UnitSuite;

pub fn suite() -> UnitSuite {
    UnitSuite::new("lib")
        .case("return_one() - Should return 1", |done| {
            ensure!(return_one() == 1, "expected 1, got {}", return_one());
            done.signal();
            Ok(())
        })
        .case("add_to_one() - Should return a number", |done| {
            let value = add_to_one(&json!(3))?;
            ensure!(value.is_finite(), "expected a finite number, got {value}");
            done.signal();
            Ok(())
        })
        .case("add_to_one() - Should return 5", |done| {
            let value = add_to_one(&json!(4))?;
            ensure!(value == 5.0, "expected 5, got {value}");
            done.signal();
            Ok(())
        })
        .case("add_to_one() - Should not throw when provided a number", |done| {
            let result = add_to_one(&json!(3));
            ensure!(result.is_ok(), "expected Ok (nothing raised) for 3, got {result:?}");
            done.signal();
            Ok(())
        })
        .case(
            "add_to_one() - Should throw when not a number type is provided",
            |done| {
                for input in [json!("string"), json!(true), json!({}), json!([])] {
                    ensure!(add_to_one(&input).is_err(), "expected Err (raised) for {input}");
                }
                done.signal();
                Ok(())
            },
        )
        .case("return_hello_string() - Should return \"hello\"", |done| {
            ensure!(
                return_hello_string() == "hello",
                "expected \"hello\", got {:?}",
                return_hello_string()
            );
            done.signal();
            Ok(())
        })
        .case("return_hello_string() - Should return string", |done| {
            // A string by signature: `&str`
            let _value: &str = return_hello_string();
            done.signal();
            Ok(())
        })
        .case(
            "add_to_hello_string() - Should return \"hello world\"",
            |done| {
                let value = add_to_hello_string(&json!("world"))?;
                ensure!(value == "hello world", "expected \"hello world\", got {value:?}");
                done.signal();
                Ok(())
            },
        )
        .case(
            "add_to_hello_string() - Should not throw error when adding string",
            |done| {
                let result = add_to_hello_string(&json!("world"));
                ensure!(
                    result.is_ok(),
                    "expected Ok (nothing raised) for \"world\", got {result:?}"
                );
                done.signal();
                Ok(())
            },
        )
        .case(
            "add_to_hello_string() - Throw error when non string is given",
            |done| {
                for input in [json!(8), json!([]), json!({}), Value::Null] {
                    ensure!(
                        add_to_hello_string(&input).is_err(),
                        "expected Err (raised) for {input}"
                    );
                }
                done.signal();
                Ok(())
            },
        )
}
