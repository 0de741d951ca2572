//! Tests for the form facade.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::*;
use crate::core::{MaxLengthMode, ValidationStrategy};
use crate::events::CollectingEventSink;
use crate::store::{WatchOptions, WatchTarget};
use crate::testing::{
    assert_field_error, assert_form_clean, assert_no_field_error, form_values, signup_form,
    signup_json_schema_resolver, signup_object_resolver, signup_typed_resolver, RecordingFocus,
    RecordingValidator, ScriptedValidator, StaticResolver, TestSubmitEvent,
};

fn two_field_form(options: FormOptions) -> Form {
    Form::new(options.with_defaults(form_values(json!({"name": "", "email": ""}))))
}

#[test]
fn test_register_returns_binding() {
    let form = Form::with_defaults(form_values(json!({"name": "Jack"})));
    let binding = form.register("name", None);
    assert_eq!(binding.name(), "name");
    assert_eq!(binding.value(), json!("Jack"));
    assert!(binding.rules().is_none());
    assert!(form.registered_fields().is_empty());
}

#[test]
fn test_register_unknown_field_adds_null() {
    let form = Form::default();
    let binding = form.register("nickname", None);
    assert_eq!(binding.value(), Value::Null);
    assert_eq!(form.get_value("nickname"), Some(Value::Null));
}

#[test]
fn test_on_input_writes_and_validates() {
    let form = two_field_form(FormOptions::new());
    let binding = form.register("name", Some(FieldRules::new().required()));

    assert!(!binding.on_input(json!("  ")).unwrap());
    assert_eq!(form.get_value("name"), Some(json!("  ")));
    assert_field_error(&form, "name", "This field is required");

    assert!(binding.on_input(json!("Jack")).unwrap());
    assert_no_field_error(&form, "name");
}

#[test]
fn test_on_input_without_rules_clears_error() {
    let form = two_field_form(FormOptions::new());
    form.store().errors().set("email", "stale");
    let binding = form.register("email", None);

    assert!(binding.on_input(json!("a@b.c")).unwrap());
    assert_no_field_error(&form, "email");
    assert!(form.errors().contains_key("email"));
}

#[test]
fn test_on_blur_never_writes() {
    let form = two_field_form(FormOptions::new());
    let binding = form.register("name", Some(FieldRules::new().required()));

    assert!(!binding.on_blur(&json!("")));
    assert!(binding.on_blur(&json!("typed but not stored")));
    assert_eq!(form.get_value("name"), Some(json!("")));
}

#[test]
fn test_validate_on_input_can_be_disabled() {
    let form = two_field_form(
        FormOptions::new().with_config(FormConfig::new().with_validate_on_input(false)),
    );
    let binding = form.register("name", Some(FieldRules::new().required()));
    assert!(binding.on_input(json!("")).unwrap());
    assert_no_field_error(&form, "name");
}

#[test]
fn test_set_value_validates_registered_field() {
    let form = two_field_form(FormOptions::new());
    let _binding = form.register("name", Some(FieldRules::new().min_length(3, "Too short")));

    form.set_value("name", json!("Al")).unwrap();
    assert_field_error(&form, "name", "Too short");

    form.set_value("email", json!("anything")).unwrap();
    assert_no_field_error(&form, "email");
}

#[test]
fn test_set_value_unknown_field() {
    let form = two_field_form(FormOptions::new());
    let err = form.set_value("nickname", json!("x")).unwrap_err();
    assert!(matches!(err, crate::errors::FormError::UnknownField(ref f) if f == "nickname"));
    assert_eq!(form.get_value("nickname"), None);
}

#[test]
fn test_max_length_mode_follows_config() {
    let legacy = two_field_form(
        FormOptions::new()
            .with_config(FormConfig::new().with_max_length_mode(MaxLengthMode::LegacyShorterThan)),
    );
    let _binding = legacy.register("name", Some(FieldRules::new().max_length(5, "Bad length")));
    legacy.set_value("name", json!("abc")).unwrap();
    assert_field_error(&legacy, "name", "Bad length");

    let fixed = two_field_form(FormOptions::new());
    let _binding = fixed.register("name", Some(FieldRules::new().max_length(5, "Bad length")));
    fixed.set_value("name", json!("abc")).unwrap();
    assert_no_field_error(&fixed, "name");
}

#[test]
fn test_validate_all_stops_at_first_failure() {
    let validator = Arc::new(RecordingValidator::new());
    let focus = Arc::new(RecordingFocus::new());
    let form = two_field_form(
        FormOptions::new()
            .with_validator(validator.clone())
            .with_focus(focus.clone()),
    );
    let _name = form.register("name", Some(FieldRules::new().required()));
    let _email = form.register("email", Some(FieldRules::new().required()));

    assert!(!form.validate_all());
    assert_eq!(validator.call_count(), 1);
    assert_eq!(validator.called_fields(), vec!["name"]);
    assert_eq!(focus.focused(), vec!["name"]);
    assert_field_error(&form, "name", "This field is required");
    assert_no_field_error(&form, "email");
}

#[test]
fn test_validate_all_stops_even_without_focus_target() {
    let validator = Arc::new(
        ScriptedValidator::new()
            .failing("name", "bad")
            .failing("email", "bad"),
    );
    let focus = Arc::new(RecordingFocus::missing_elements());
    let form = two_field_form(
        FormOptions::new()
            .with_validator(validator.clone())
            .with_focus(focus.clone()),
    );
    let _name = form.register("name", Some(FieldRules::new().required()));
    let _email = form.register("email", Some(FieldRules::new().required()));

    assert!(!form.validate_all());
    assert_eq!(validator.called_fields(), vec!["name"]);
    assert_eq!(focus.call_count(), 1);
}

#[test]
fn test_validate_all_every_field_strategy() {
    let focus = Arc::new(RecordingFocus::new());
    let form = two_field_form(
        FormOptions::new()
            .with_focus(focus.clone())
            .with_config(FormConfig::new().with_validation_strategy(ValidationStrategy::AllFields)),
    );
    let _name = form.register("name", Some(FieldRules::new().required()));
    let _email = form.register("email", Some(FieldRules::new().required_with("Email please")));

    assert!(!form.validate_all());
    assert_field_error(&form, "name", "This field is required");
    assert_field_error(&form, "email", "Email please");
    assert_eq!(focus.focused(), vec!["name"]);
}

#[test]
fn test_focus_on_error_can_be_disabled() {
    let mut focus = MockFieldFocus::new();
    focus.expect_focus().never();
    let form = two_field_form(
        FormOptions::new()
            .with_focus(Arc::new(focus))
            .with_config(FormConfig::new().with_focus_on_error(false)),
    );
    let _name = form.register("name", Some(FieldRules::new().required()));
    assert!(!form.validate_all());
}

#[test]
fn test_validate_all_focuses_with_mock() {
    let mut focus = MockFieldFocus::new();
    focus
        .expect_focus()
        .withf(|name| name.to_string() == "email")
        .times(1)
        .return_const(true);
    let form = Form::new(
        FormOptions::new()
            .with_defaults(form_values(json!({"name": "Jack", "email": ""})))
            .with_focus(Arc::new(focus)),
    );
    let _name = form.register("name", Some(FieldRules::new().required()));
    let _email = form.register("email", Some(FieldRules::new().required()));
    assert!(!form.validate_all());
}

#[test]
fn test_validate_all_clears_stale_errors() {
    let form = two_field_form(FormOptions::new());
    form.store().errors().set("email", "stale");
    let _name = form.register("name", Some(FieldRules::new()));

    assert!(form.validate_all());
    assert_form_clean(&form);
    assert_eq!(form.errors().get("email"), Some(&None));
}

#[test]
fn test_reregistration_keeps_validation_order() {
    let validator = Arc::new(ScriptedValidator::new());
    let form = two_field_form(FormOptions::new().with_validator(validator.clone()));
    let _a = form.register("name", Some(FieldRules::new().required()));
    let _b = form.register("email", Some(FieldRules::new().required()));
    let _c = form.register("name", Some(FieldRules::new().min_length(2, "short")));

    assert!(form.validate_all());
    assert_eq!(validator.called_fields(), vec!["name", "email"]);
    assert_eq!(
        form.rules_for("name").map(|r| r.kinds()),
        Some(vec![crate::rules::RuleKind::MinLength])
    );
}

#[test]
fn test_resolver_supersedes_rules() {
    let validator = Arc::new(RecordingValidator::new());
    let resolver = Arc::new(StaticResolver::accepting());
    let form = two_field_form(
        FormOptions::new()
            .with_validator(validator.clone())
            .with_shared_resolver(resolver.clone()),
    );
    let _name = form.register("name", Some(FieldRules::new().required()));

    assert!(form.validate_all());
    assert_eq!(validator.call_count(), 0);
    assert_eq!(resolver.call_count(), 1);
    assert_eq!(resolver.seen()[0], form.values());
}

#[test]
fn test_resolver_errors_land_in_error_bag() {
    let resolvers: Vec<Arc<dyn crate::resolvers::Resolver>> = vec![
        Arc::new(signup_json_schema_resolver().unwrap()),
        Arc::new(signup_object_resolver()),
        Arc::new(signup_typed_resolver()),
    ];
    for resolver in resolvers {
        let focus = Arc::new(RecordingFocus::new());
        let form = Form::new(
            FormOptions::new()
                .with_defaults(form_values(json!({"name": "", "age": 15})))
                .with_shared_resolver(resolver)
                .with_focus(focus.clone()),
        );
        assert!(!form.validate_all());
        assert!(form.error("name").is_some());
        assert!(form.error("age").is_some());
        assert_eq!(focus.call_count(), 0);

        form.set_value("name", json!("Jack")).unwrap();
        form.set_value("age", json!(30)).unwrap();
        assert!(form.validate_all());
        assert_form_clean(&form);
    }
}

#[test]
fn test_handle_submit_delivers_independent_snapshot() {
    let form = signup_form(FormOptions::new());
    form.set_value("name", json!("Jack")).unwrap();
    form.set_value("age", json!(25)).unwrap();

    let received = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&received);
    let mut submit = form.handle_submit(move |values| {
        *sink.lock() = Some(values);
    });

    let mut event = TestSubmitEvent::new();
    submit(&mut event);
    assert!(event.default_prevented);

    form.set_value("name", json!("Jill")).unwrap();

    let snapshot = received.lock().clone().unwrap();
    assert_eq!(snapshot, form_values(json!({"name": "Jack", "age": 25})));
    assert_eq!(form.get_value("name"), Some(json!("Jill")));
}

#[test]
fn test_handle_submit_skips_callback_when_invalid() {
    let sink = Arc::new(CollectingEventSink::new());
    let form = signup_form(FormOptions::new().with_sink(sink.clone()));

    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let mut submit = form.handle_submit(move |_| *counter.lock() += 1);

    let mut event = TestSubmitEvent::new();
    submit(&mut event);

    assert!(event.default_prevented);
    assert_eq!(*calls.lock(), 0);
    assert_eq!(sink.events_of_type("form.submit.rejected").len(), 1);
    assert!(sink.events_of_type("form.submitted").is_empty());
}

#[derive(Debug, Deserialize, PartialEq)]
struct Signup {
    name: String,
    age: u32,
}

#[test]
fn test_handle_submit_typed() {
    let form = signup_form(FormOptions::new());
    form.set_value("name", json!("Jack")).unwrap();
    form.set_value("age", json!(25)).unwrap();

    let received = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&received);
    let mut submit = form.handle_submit_typed(move |signup: Signup| {
        *sink.lock() = Some(signup);
    });
    submit(&mut TestSubmitEvent::new());

    assert_eq!(
        *received.lock(),
        Some(Signup {
            name: "Jack".to_string(),
            age: 25
        })
    );
}

#[test]
fn test_handle_submit_typed_conversion_failure() {
    let sink = Arc::new(CollectingEventSink::new());
    let form = signup_form(FormOptions::new().with_sink(sink.clone()));
    form.set_value("name", json!("Jack")).unwrap();

    let called = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&called);
    let mut submit = form.handle_submit_typed(move |_: Signup| *flag.lock() = true);
    submit(&mut TestSubmitEvent::new());

    assert!(!*called.lock());
    let rejected = sink.events_of_type("form.submit.rejected");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].1.as_ref().unwrap()["reason"], "conversion");
}

#[test]
fn test_reset_single_field() {
    let form = Form::with_defaults(form_values(json!({"name": "Jack", "email": ""})));
    form.set_value("name", json!("Jill")).unwrap();
    form.store().errors().set("name", "bad");

    form.reset(Some("name")).unwrap();
    assert_eq!(form.get_value("name"), Some(json!("Jack")));
    assert_eq!(form.errors().get("name"), Some(&None));
    assert!(form.reset(Some("nickname")).is_err());
}

#[test]
fn test_reset_all_clears_registry() {
    let sink = Arc::new(CollectingEventSink::new());
    let form = signup_form(FormOptions::new().with_sink(sink.clone()));
    let _extra = form.register("nickname", None);
    form.set_value("nickname", json!("JJ")).unwrap();
    assert!(!form.validate_all());

    form.reset(None).unwrap();
    assert!(form.registered_fields().is_empty());
    assert_eq!(form.get_value("nickname"), Some(Value::Null));
    assert_eq!(form.get_value("name"), Some(json!("")));
    assert_form_clean(&form);
    assert!(form.validate_all());
    assert_eq!(sink.events_of_type("form.reset").len(), 1);
}

#[test]
fn test_watch_field_and_replace() {
    let form = two_field_form(FormOptions::new());
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&first);
    let old_handle = form.watch("name", WatchOptions::new(), move |new, _| {
        seen.lock().push(new.clone());
    });
    form.set_value("name", json!("a")).unwrap();

    let seen = Arc::clone(&second);
    let handle = form.watch("name", WatchOptions::new(), move |new, old| {
        seen.lock().push((new.clone(), old.cloned()));
    });
    assert_eq!(form.store().watchers().active_count(), 1);

    form.set_value("name", json!("b")).unwrap();
    assert_eq!(*first.lock(), vec![json!("a")]);
    assert_eq!(*second.lock(), vec![(json!("b"), Some(json!("a")))]);

    assert!(!old_handle.unsubscribe());
    assert!(handle.unsubscribe());
    assert_eq!(form.store().watchers().active_count(), 0);
}

#[test]
fn test_watch_all_immediate() {
    let form = two_field_form(FormOptions::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _handle = form.watch(
        WatchTarget::All,
        WatchOptions::new().with_immediate(true),
        move |new, old| sink.lock().push((new.clone(), old.is_some())),
    );

    form.set_value("email", json!("a@b.c")).unwrap();
    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (json!({"name": "", "email": ""}), false));
    assert_eq!(seen[1], (json!({"name": "", "email": "a@b.c"}), true));
}

#[test]
fn test_watch_callback_can_read_form() {
    let form = two_field_form(FormOptions::new());
    let reader = form.clone();
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let _handle = form.watch("name", WatchOptions::new(), move |_, _| {
        *sink.lock() = reader.get_value("email");
    });
    form.set_value("name", json!("Jack")).unwrap();
    assert_eq!(*seen.lock(), Some(json!("")));
}

#[test]
fn test_lifecycle_events_carry_envelope() {
    let sink = Arc::new(CollectingEventSink::new());
    let form = two_field_form(
        FormOptions::new()
            .with_sink(sink.clone())
            .with_config(FormConfig::new().with_name("signup")),
    );
    let _name = form.register("name", Some(FieldRules::new().required()));
    form.set_value("name", json!("")).unwrap();
    form.validate_all();

    assert_eq!(
        sink.event_types(),
        vec!["form.field.invalid", "form.field.invalid", "form.validated"]
    );
    let (_, payload) = &sink.events()[2];
    let payload = payload.as_ref().unwrap();
    assert_eq!(payload["form"], "signup");
    assert_eq!(payload["form_id"], form.id().to_string());
    assert_eq!(payload["valid"], false);
    assert_eq!(payload["error_count"], 1);
}

#[test]
fn test_form_is_shared_across_clones() {
    let form = two_field_form(FormOptions::new());
    let other = form.clone();
    other.set_value("name", json!("Jack")).unwrap();
    assert_eq!(form.get_value("name"), Some(json!("Jack")));
    assert_eq!(form.id(), other.id());
    assert!(!form.has_resolver());
    assert_eq!(form.name(), "form");
}
