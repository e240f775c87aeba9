mod common;

use blueink_examples::models::Person;
use blueink_examples::ui::{is_input_closed, Example, PersonExample};
use common::{console, output, person, FakeApi};
use serde_json::json;
use std::cell::RefCell;

fn api_with(persons: Vec<Person>) -> FakeApi {
    FakeApi {
        persons: RefCell::new(persons),
        ..FakeApi::default()
    }
}

#[test]
fn create_and_send_person_ends_the_example() {
    let api = FakeApi::default();
    let mut console = console(&["1", "HOMER", "SIMPSON", "", "n", "n", "n", "2", "n"]);

    PersonExample::new(&api, &mut console)
        .run()
        .expect("flow finishes after send");

    let out = output(console);
    assert!(out.contains("Your choice: `Send Person to Server`"));
    assert!(out.ends_with(
        "Example Concluded. To create a new Person, start the example script again.\n"
    ));
    assert_eq!(out.matches("\nMain Menu\n").count(), 1);

    assert_eq!(
        *api.created_persons.borrow(),
        vec![json!({
            "name": "HOMER SIMPSON",
            "channels": [{"kind": "mp", "phone": "505 555 5555"}],
        })]
    );
}

#[test]
fn returned_data_is_shown_on_request() {
    let api = FakeApi::default();
    let mut console = console(&["1", "BART", "SIMPSON", "505 555 0000", "n", "n", "n", "2", "y"]);

    PersonExample::new(&api, &mut console)
        .run()
        .expect("flow finishes after send");

    let out = output(console);
    assert!(out.contains("\"phone\": \"505 555 0000\""));
}

#[test]
fn print_then_exit_keeps_running() {
    let api = FakeApi::default();
    let mut console = console(&[
        "1",
        "MARGE",
        "SIMPSON",
        "505 555 1111",
        "y",
        "505 555 2222",
        "n",
        "y",
        "marge@example.com",
        "n",
        "y",
        "team",
        "blue",
        "y",
        "team",
        "red",
        "n",
        "1",
        "3",
    ]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("'team' value: "));
    assert!(out.contains("\"team\": \"red\""));
    assert!(out.contains("\"email\": \"marge@example.com\""));
    assert!(out.contains("\"phone\": \"505 555 2222\""));
    assert_eq!(out.matches("\nPerson Menu\n").count(), 2);
    assert_eq!(out.matches("\nMain Menu\n").count(), 2);
    assert!(api.calls().is_empty());
}

#[test]
fn failed_create_returns_to_main_menu() {
    let api = FakeApi {
        fail_create: true,
        ..FakeApi::default()
    };
    let mut console = console(&["1", "MOE", "VANCE", "", "n", "n", "n", "2"]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("Failed to create person, HTTP 400: {\"name\":[\"invalid\"]}"));
    assert!(out.contains("Returning to main menu"));
    assert_eq!(out.matches("\nMain Menu\n").count(), 2);
}

#[test]
fn list_persons_with_metadata() {
    let api = api_with(vec![
        person("p-1", "HOMER SIMPSON"),
        person("p-2", "MARGE SIMPSON"),
    ]);
    let mut console = console(&["2", "y"]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("Response Code: 200\nTotal Persons: 2\n"));
    assert!(out.contains("  - Person p-1: HOMER SIMPSON\n"));
    assert!(out.contains("  - Person p-2: MARGE SIMPSON\n"));
    assert_eq!(out.matches("     meta:").count(), 2);
    assert!(out.contains("\"source\": \"test\""));
}

#[test]
fn list_failure_is_reported() {
    let api = FakeApi {
        fail_list: true,
        ..FakeApi::default()
    };
    let mut console = console(&["2", ""]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("Response Code: 500\nResponse error: HTTP 500\n"));
    assert!(!out.contains("Total Persons"));
    assert_eq!(out.matches("\nMain Menu\n").count(), 2);
}

#[test]
fn delete_several_persons() {
    let api = api_with(vec![
        person("p-1", "HOMER SIMPSON"),
        person("p-2", "MARGE SIMPSON"),
        person("p-3", "LISA SIMPSON"),
    ]);
    let mut console = console(&["4", "2", "y", "1", "n"]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("Fetch List Response Code: 200"));
    assert!(out.contains("2) MARGE SIMPSON (p-2)"));
    assert!(out.contains("Attempting to delete 'MARGE SIMPSON' by ID 'p-2'"));
    assert!(out.contains("Successfully deleted person 'MARGE SIMPSON'\n"));
    assert!(out.contains("Successfully deleted person 'HOMER SIMPSON'\n"));
    assert_eq!(
        api.calls(),
        vec!["list_persons", "delete_person(p-2)", "delete_person(p-1)"]
    );
    let remaining: Vec<_> = api.persons.borrow().iter().map(|p| p.id.clone()).collect();
    assert_eq!(remaining, vec!["p-3"]);
}

#[test]
fn delete_stops_when_nobody_is_left() {
    let api = api_with(vec![person("p-1", "HOMER SIMPSON")]);
    let mut console = console(&["4", "1"]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(!out.contains("Delete more Persons"));
    assert_eq!(out.matches("\nMain Menu\n").count(), 2);
}

#[test]
fn delete_with_no_persons_does_not_prompt() {
    let api = FakeApi::default();
    let mut console = console(&["4"]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("** No persons to delete **"));
    assert_eq!(api.calls(), vec!["list_persons"]);
}

fn editable_person() -> Person {
    serde_json::from_value(json!({
        "id": "p-1",
        "name": "HOMER SIMPSON",
        "metadata": {},
        "channels": [],
        "age": 39,
        "score": 1.5,
    }))
    .expect("person fixture")
}

#[test]
fn update_coerces_values_to_field_types() {
    let api = api_with(vec![editable_person()]);
    // fields come in key order: age, name, score
    let mut console = console(&[
        "3", "1", "y", "forty", "40", "n", "", "y", "2.5", "n",
    ]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("Updating p-1 (HOMER SIMPSON)"));
    assert!(out.contains("Original value for key 'age': 39"));
    assert!(out.contains("New value (integer) [39]: "));
    assert!(out.contains("Incorrect type. Must be integer"));
    assert!(out.contains("Original value for key 'name': HOMER SIMPSON"));
    assert!(!out.contains("Original value for key 'id'"));
    assert!(out.contains("Successfully updated person with id p-1"));

    assert_eq!(api.calls(), vec!["list_persons", "update_person(p-1, partial=true)"]);
    let updates = api.updates.borrow();
    assert_eq!(updates[0].0, "p-1");
    assert_eq!(
        serde_json::Value::Object(updates[0].1.clone()),
        json!({"age": 40, "score": 2.5})
    );
}

#[test]
fn update_without_changes_sends_nothing() {
    let api = api_with(vec![editable_person()]);
    let mut console = console(&["3", "1", "n", "n"]);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert!(out.contains("No changes to send."));
    assert!(!out.contains("Original value for key 'name'"));
    assert_eq!(api.calls(), vec!["list_persons"]);
}

#[test]
fn update_gives_up_after_repeated_bad_values() {
    let api = api_with(vec![editable_person()]);
    let mut lines = vec!["3", "1", "y"];
    lines.extend(["forty"; 10]);
    let mut console = console(&lines);

    let result = PersonExample::new(&api, &mut console).run();
    assert!(is_input_closed(&result.unwrap_err()));

    let out = output(console);
    assert_eq!(out.matches("Incorrect type. Must be integer").count(), 10);
    assert!(out.contains("** Too many invalid answers, returning to main menu **\n"));
    assert!(!out.contains("Original value for key 'name'"));
    assert_eq!(out.matches("\nMain Menu\n").count(), 2);
    assert_eq!(api.calls(), vec!["list_persons"]);
    assert!(api.updates.borrow().is_empty());
}
