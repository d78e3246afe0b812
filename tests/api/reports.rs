use serde_json::{json, Value};

use crate::support::{admin, customer, ok, service, status};

fn report(target: &str) -> Value {
    json!({ "targetType": "recipe", "targetId": target, "reason": "spam" })
}

#[test]
fn queue_is_oldest_first_and_filterable() {
    let service = service();
    let first = ok(service.dispatch("reports.create", report("r1"), customer("a")));
    std::thread::sleep(std::time::Duration::from_millis(5));
    ok(service.dispatch("reports.create", report("r2"), customer("b")));

    let queue = ok(service.dispatch("reports.list", json!({}), admin()));
    assert_eq!(queue["total"], 2);
    assert_eq!(queue["reports"][0]["targetId"], "r1");

    ok(service.dispatch(
        "reports.update",
        json!({ "id": first["report"]["id"], "status": "resolved", "note": "removed recipe" }),
        admin(),
    ));

    let pending = ok(service.dispatch("reports.list", json!({ "status": "pending" }), admin()));
    assert_eq!(pending["total"], 1);
    assert_eq!(pending["reports"][0]["targetId"], "r2");

    let resolved = ok(service.dispatch("reports.list", json!({ "status": "resolved" }), admin()));
    assert_eq!(resolved["reports"][0]["resolvedBy"], "admin-1");
    assert_eq!(resolved["reports"][0]["resolutionNote"], "removed recipe");
}

#[test]
fn only_admins_moderate() {
    let service = service();
    let created = ok(service.dispatch("reports.create", report("r1"), customer("a")));
    assert_eq!(status(service.dispatch("reports.list", json!({}), customer("a"))), 403);
    assert_eq!(
        status(service.dispatch(
            "reports.update",
            json!({ "id": created["report"]["id"], "status": "dismissed" }),
            customer("a"),
        )),
        403
    );
}

#[test]
fn unknown_report_and_bad_target() {
    let service = service();
    assert_eq!(
        status(service.dispatch("reports.update", json!({ "id": "nope", "status": "reviewed" }), admin())),
        404
    );
    let bad = json!({ "targetType": "planet", "targetId": "x", "reason": "spam" });
    assert_eq!(status(service.dispatch("reports.create", bad, customer("a"))), 400);
}
