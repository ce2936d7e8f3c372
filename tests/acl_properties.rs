use serde_json::{json, Value};

use simple_acl::{evaluate, is_allowed, is_allowed_value, Grant, Identifier, PermissionSet, User};

fn users() -> Vec<Value> {
    vec![
        json!({}),
        json!({"id": 1}),
        json!({"id": 5, "role": "editor"}),
        json!({"_id": "abc", "role": "admin"}),
        json!({"id": "5", "role": ""}),
    ]
}

#[test]
fn no_special_token_and_no_match_denies() {
    let perms = json!(["auditor", "billing", {"nested": "admin"}]);
    for user in users() {
        assert!(!is_allowed_value(&user, &perms), "{user} should be denied");
    }
    for user in users() {
        assert!(!is_allowed_value(&user, &json!([])), "{user} should be denied by an empty set");
        assert!(!is_allowed_value(&user, &json!({})), "{user} should be denied by an empty map");
    }
}

#[test]
fn any_always_allows() {
    for user in users() {
        assert!(is_allowed_value(&user, &json!(["any"])));
        assert!(is_allowed_value(&user, &json!("any")));
        assert!(is_allowed_value(&user, &json!({"owner": 999, "x": "any"})));
    }
}

#[test]
fn user_token() {
    assert!(!is_allowed_value(&json!({}), &json!(["user"])));
    assert!(!is_allowed_value(&Value::Null, &json!(["user"])));
    assert!(is_allowed_value(&json!({"id": 1}), &json!(["user"])));
}

#[test]
fn owner_rule() {
    assert!(is_allowed_value(&json!({"id": 5}), &json!({"owner": 5})));
    assert!(!is_allowed_value(&json!({"id": 5}), &json!({"owner": 6})));
    assert!(!is_allowed_value(&json!({"id": 5}), &json!({"owner": 0})));
    assert!(is_allowed_value(&json!({"id": 5}), &json!({"owner": 0, "0": "user"})));
    assert!(is_allowed_value(&json!({"_id": "abc"}), &json!({"owner": "abc"})));
}

#[test]
fn role_rule() {
    assert!(is_allowed_value(&json!({"role": "admin"}), &json!(["editor", "admin"])));
    assert!(!is_allowed_value(&json!({"role": "admin"}), &json!(["editor"])));
}

/// Allow/deny computed without any ordering: some rule matches or none does.
fn expected(user: &User, perms: &PermissionSet) -> bool {
    let owner_match = perms.owner.is_some() && perms.owner == user.id;
    owner_match
        || perms
            .tokens
            .iter()
            .any(|t| t == "any" || user.has_role(t) || (t == "user" && !user.is_empty()))
}

fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for (idx, head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(idx);
        for mut tail in permutations(&rest) {
            tail.insert(0, *head);
            out.push(tail);
        }
    }
    out
}

#[test]
fn token_order_does_not_change_outcome() {
    let token_lists: [&[&'static str]; 5] = [
        &["user", "editor", "any", "admin"],
        &["user", "editor", "admin"],
        &["editor", "admin", "billing"],
        &["zeta", "user"],
        &[],
    ];
    let owners = [None, Some(json!(5)), Some(json!("abc")), Some(json!(0))];

    for user in users() {
        let user = User::from_value(&user);
        for tokens in token_lists {
            for order in permutations(tokens) {
                for owner in &owners {
                    // built field by field so the tokens keep insertion order
                    let perms = PermissionSet {
                        owner: owner.as_ref().and_then(Identifier::from_value),
                        tokens: order.iter().map(|t| t.to_string()).collect(),
                    };
                    assert_eq!(
                        is_allowed(&user, &perms),
                        expected(&user, &perms),
                        "user {:?} perms {:?}",
                        user,
                        perms
                    );

                    let mut declared = serde_json::Map::new();
                    for (idx, token) in order.iter().enumerate() {
                        declared.insert(format!("k{idx}"), json!(token));
                    }
                    if let Some(owner) = owner {
                        declared.insert("owner".to_string(), owner.clone());
                    }
                    assert_eq!(
                        is_allowed_value(&Value::Object(user.attributes.clone()), &Value::Object(declared)),
                        expected(&user, &perms)
                    );
                }
            }
        }
    }
}

#[test]
fn grant_is_the_same_for_every_order() {
    let user = User::from_value(&json!({"id": 1, "role": "user"}));
    let reference = evaluate(&user, &PermissionSet::roles(["user", "any"]));
    for order in permutations(&["user", "any", "editor"]) {
        assert_eq!(evaluate(&user, &PermissionSet::roles(order)), reference);
    }
    assert_eq!(reference, Some(Grant::Any));
}

#[test]
fn null_id_falls_back_to_document_id() {
    assert!(is_allowed_value(&json!({"id": null, "_id": "abc"}), &json!({"owner": "abc"})));
    assert!(!is_allowed_value(&json!({"id": null, "_id": "abc"}), &json!({"owner": "abd"})));
}

#[test]
fn grant_reports_first_rule_in_ascending_order() {
    let user = User::from_value(&json!({"id": 3, "role": "editor"}));
    let perms = PermissionSet::roles(["user", "editor"]);
    assert_eq!(evaluate(&user, &perms), Some(Grant::Role("editor".to_string())));

    let owner_first = PermissionSet::roles(["any"]).with_owner(3i64);
    assert_eq!(evaluate(&user, &owner_first), Some(Grant::Owner));
}
