//! Invariants and edge cases: audit completeness, swap atomicity, stock
//! policies, non-rescaling pax changes, table void semantics.

use super::*;

use shared::session::{CommandErrorCode, CommandPayload, OrderKind};

use crate::config::StockPolicy;

#[test]
fn test_audit_completeness_for_package_selection() {
    let engine = engine();
    open(&engine, "t1", 4);
    select_package(&engine, "t1", "unli_pork");

    // exactly one audit entry per side deduction, all in one group
    let entries = engine.audit.entries();
    assert_eq!(entries.len(), 5);
    let group_ids: std::collections::HashSet<_> =
        entries.iter().map(|e| e.group_id.clone()).collect();
    assert_eq!(group_ids.len(), 1);
    assert!(entries.iter().all(|e| e.delta == -4.0));
    assert!(entries.iter().all(|e| e.actor.name == "Ana"));

    // and the grouped view collapses them into one transaction
    let grouped = engine.audit.grouped();
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].entries.len(), 5);
}

#[test]
fn test_audit_matches_ledger_history() {
    let engine = engine();
    open(&engine, "t1", 2);
    select_package(&engine, "t1", "unli_pork");
    engine.manager.execute_command(cmd(CommandPayload::AddMeat {
        table_id: "t1".to_string(),
        meat_id: "pork_samgyup".to_string(),
        grams: 250.0,
    }));

    // every ledger movement has a matching audit entry
    let history = engine.ledger.history("pork_samgyup_sliced");
    assert_eq!(history.len(), 1);
    let audit_for_meat: Vec<_> = engine
        .audit
        .entries()
        .into_iter()
        .filter(|e| e.item_name == "Samgyupsal (sliced)")
        .collect();
    assert_eq!(audit_for_meat.len(), 1);
    assert_eq!(audit_for_meat[0].delta, history[0].delta);
    assert_eq!(audit_for_meat[0].note, history[0].note);
}

#[test]
fn test_package_swap_atomicity() {
    let engine = engine();
    open(&engine, "t1", 4);
    select_package(&engine, "t1", "unli_pork");

    // a manual paid side placed between the two selections
    let response = engine.manager.execute_command(cmd(CommandPayload::AddSide {
        table_id: "t1".to_string(),
        item_id: "kimchi".to_string(),
        name: "Extra Kimchi".to_string(),
        quantity: 1,
        unit_price: 49.0,
    }));
    assert!(response.success);

    let before: Vec<String> = engine
        .manager
        .session("t1")
        .unwrap()
        .lines
        .iter()
        .filter(|l| l.auto || l.kind == OrderKind::Package)
        .map(|l| l.line_id.clone())
        .collect();

    select_package(&engine, "t1", "unli_premium");

    let session = engine.manager.session("t1").unwrap();
    // none of package A's generated lines survive
    assert!(
        session
            .lines
            .iter()
            .all(|l| !before.contains(&l.line_id))
    );
    // exactly B's lines were added: package charge + 3 sides
    let generated: Vec<_> = session
        .lines
        .iter()
        .filter(|l| l.auto || l.kind == OrderKind::Package)
        .collect();
    assert_eq!(generated.len(), 4);
    assert!(
        generated
            .iter()
            .all(|l| l.package_id.as_deref() == Some("unli_premium"))
    );
    // the manual line is untouched
    assert!(session.lines.iter().any(|l| l.name == "Extra Kimchi"));
    // ₱499 x 4 + ₱49
    assert_eq!(session.subtotal, 2045.0);
}

#[test]
fn test_clamp_policy_floors_stock_at_zero() {
    let engine = engine();
    open(&engine, "t1", 2);
    select_package(&engine, "t1", "unli_pork");

    // 5000g seeded; order far past it in slices
    for _ in 0..3 {
        let response = engine.manager.execute_command(cmd(CommandPayload::AddMeat {
            table_id: "t1".to_string(),
            meat_id: "pork_samgyup".to_string(),
            grams: 2000.0,
        }));
        assert!(response.success);
    }
    assert_eq!(engine.ledger.level("pork_samgyup_sliced"), 0.0);
}

#[test]
fn test_reject_policy_fails_before_any_mutation() {
    let engine = engine_with_policy(StockPolicy::Reject);
    // drain rice to 3 so a 4-pax package cannot be served
    engine
        .ledger
        .adjust(
            "rice",
            -97.0,
            "spoilage",
            crate::inventory::AdjustContext::new(&staff()),
        )
        .unwrap();
    let audit_before = engine.audit.len();

    open(&engine, "t1", 4);
    let response = engine
        .manager
        .execute_command(cmd(CommandPayload::SelectPackage {
            table_id: "t1".to_string(),
            package_id: "unli_pork".to_string(),
        }));
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::InsufficientStock
    );

    // the command failed whole: no package on the session, no deductions,
    // no audit entries
    let session = engine.manager.session("t1").unwrap();
    assert!(session.package_id.is_none());
    assert!(session.lines.is_empty());
    assert_eq!(engine.ledger.level("rice"), 3.0);
    assert_eq!(engine.audit.len(), audit_before);
}

#[test]
fn test_change_pax_does_not_rescale_auto_lines() {
    let engine = engine();
    open(&engine, "t1", 4);
    select_package(&engine, "t1", "unli_pork");

    let response = engine.manager.execute_command(cmd(CommandPayload::ChangePax {
        table_id: "t1".to_string(),
        persons: 6,
    }));
    assert!(response.success);

    let session = engine.manager.session("t1").unwrap();
    assert_eq!(session.persons, 6);
    // auto sides keep quantity 4; the package charge keeps its price
    assert!(
        session
            .lines
            .iter()
            .filter(|l| l.auto)
            .all(|l| l.quantity == 4)
    );
    assert_eq!(session.subtotal, 1396.0);
    // stock untouched by the pax change
    assert_eq!(engine.ledger.level("rice"), 96.0);
}

#[test]
fn test_void_table_frees_without_inventory_reversal() {
    let engine = engine();
    open(&engine, "t1", 4);
    select_package(&engine, "t1", "unli_pork");
    let rice_after_package = engine.ledger.level("rice");

    let response = engine
        .manager
        .execute_command(boss_cmd(CommandPayload::VoidTable {
            table_id: "t1".to_string(),
            reason: Some("walkout".to_string()),
        }));
    assert!(response.success);

    assert!(engine.manager.session("t1").is_none());
    assert_eq!(engine.ledger.level("rice"), rice_after_package);
    // a voided table is not a sale
    assert!(engine.manager.closed_transactions().is_empty());
}

#[test]
fn test_void_order_requires_approval_for_staff() {
    let engine = engine();
    open(&engine, "t1", 4);
    engine.manager.execute_command(cmd(CommandPayload::AddPaidItem {
        table_id: "t1".to_string(),
        item_id: "tteokbokki".to_string(),
        name: "Tteokbokki".to_string(),
        kind: OrderKind::Dish,
        quantity: 1,
        unit_price: 149.0,
    }));
    let line_id = engine.manager.session("t1").unwrap().lines[0].line_id.clone();

    let response = engine.manager.execute_command(cmd(CommandPayload::VoidOrder {
        table_id: "t1".to_string(),
        line_id,
        reason: None,
    }));
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::ApprovalRequired
    );
    assert!(!engine.manager.session("t1").unwrap().lines[0].voided);
}

#[test]
fn test_merge_missing_source_is_typed_error() {
    let engine = engine();
    open(&engine, "t1", 4);
    let response = engine
        .manager
        .execute_command(boss_cmd(CommandPayload::MergeTable {
            source_table_id: "t2".to_string(),
            target_table_id: "t1".to_string(),
        }));
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::TableNotOccupied
    );
}

#[test]
fn test_stock_stays_non_negative_through_any_command_sequence() {
    let engine = engine();
    open(&engine, "t1", 4);
    select_package(&engine, "t1", "unli_pork");
    for _ in 0..30 {
        engine.manager.execute_command(cmd(CommandPayload::AddSide {
            table_id: "t1".to_string(),
            item_id: "kimchi".to_string(),
            name: "Extra Kimchi".to_string(),
            quantity: 9,
            unit_price: 0.0,
        }));
    }
    for level in engine.ledger.levels() {
        assert!(level.quantity >= 0.0, "{} went negative", level.item_id);
    }
}
