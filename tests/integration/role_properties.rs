//! Integration test: role table properties over resolved identities.
//!
//! The protocol gate and the handlers read the same table; these tests
//! check that they never disagree in the permissive direction.

mod common;

use common::*;
use lawcorp::policy::{operations, profile_for, CaseScope};
use lawcorp::{
    CaseId, CaseService, FirmIdentity, FirmRole, FirmStore, RolePermissionMatrix, SearchCases,
    ToolPermissionPolicy,
};

const EVERYONE: [lawcorp::PersonId; 6] = [PARTNER, ASSOCIATE, COUNSEL, PARALEGAL, ASSISTANT, INTERN];

fn identity(firm: &Firm, person: lawcorp::PersonId) -> FirmIdentity {
    firm.caller(&subject_of(person)).identity().cloned().unwrap()
}

#[test]
fn each_seeded_person_resolves_to_their_role() {
    let firm = Firm::seeded();
    let roles: Vec<FirmRole> = EVERYONE.iter().map(|p| identity(&firm, *p).role).collect();
    assert_eq!(roles, FirmRole::ALL);
}

#[test]
fn permitted_list_and_call_check_agree() {
    let firm = Firm::seeded();
    let policy = RolePermissionMatrix;
    let mut names: Vec<String> = operations::ALL.iter().map(|s| s.to_string()).collect();
    names.extend(operations::ALL.iter().map(|s| s.to_uppercase()));
    names.extend(["cases_delete", "", "documents", "cases_search "].map(String::from));

    for person in EVERYONE {
        let id = identity(&firm, person);
        let permitted = policy.permitted_operations(&id);
        for name in &names {
            let listed = permitted.iter().any(|op| op.eq_ignore_ascii_case(name.trim()));
            assert_eq!(listed, policy.is_allowed(name, &id), "{} / {name:?}", id.role);
        }

        let mut sorted = permitted.clone();
        sorted.sort();
        assert_eq!(permitted, sorted);
    }
}

#[test]
fn only_partners_see_every_case_and_may_assign() {
    for role in FirmRole::ALL {
        let profile = profile_for(role);
        let partner = role == FirmRole::Partner;
        assert_eq!(profile.partner, partner);
        assert_eq!(profile.may_assign, partner);
        assert_eq!(profile.case_scope == CaseScope::All, partner);
        assert_eq!(
            profile.allows(operations::CASES_ASSIGN_USER),
            partner,
            "{role}"
        );
        // Seeing privileged notes implies being an attorney.
        assert!(!profile.privileged_timeline || profile.attorney, "{role}");
    }
}

#[test]
fn handlers_refuse_what_the_gate_refuses() {
    let firm = Firm::seeded();
    let policy = RolePermissionMatrix;
    let service = CaseService::new(&firm.store);

    for person in EVERYONE {
        let id = identity(&firm, person);
        let ctx = id.context();

        if !policy.is_allowed(operations::CASES_ADD_NOTE, &id) {
            let outcome = service.add_note(&ctx, ACTIVE_CASE, "note", false).unwrap();
            assert!(outcome.is_denied(), "{} add_note", id.role);
        }
        if !policy.is_allowed(operations::CASES_ASSIGN_USER, &id) {
            let outcome = service.assign(&ctx, ACTIVE_CASE, INTERN, "Reviewer").unwrap();
            assert!(outcome.is_denied(), "{} assign", id.role);
        }
        if !policy.is_allowed(operations::CASES_UPDATE_STATUS, &id) {
            let outcome = service
                .update_status(&ctx, ACTIVE_CASE, "OnHold", None)
                .unwrap();
            assert!(outcome.is_denied(), "{} update_status", id.role);
        }
    }
}

#[test]
fn search_returns_exactly_the_visible_cases() {
    let firm = Firm::seeded();
    let service = CaseService::new(&firm.store);
    let all: Vec<CaseId> = {
        let data = firm.store.snapshot();
        let mut ids: Vec<CaseId> = data.cases.iter().map(|c| c.id).collect();
        ids.sort();
        ids
    };

    for person in EVERYONE {
        let id = identity(&firm, person);
        let page = service
            .search(&id.context(), &SearchCases::default())
            .unwrap()
            .ok()
            .unwrap();
        let mut found: Vec<CaseId> = page.results.iter().map(|c| c.id).collect();
        found.sort();

        let mut expected = if id.role == FirmRole::Partner {
            all.clone()
        } else {
            id.assigned_case_ids.clone()
        };
        expected.sort();
        assert_eq!(found, expected, "{}", id.role);
        assert_eq!(page.total_count, expected.len(), "{}", id.role);
    }
}

#[test]
fn forged_token_resolves_to_nobody() {
    let firm = Firm::seeded();
    let forged = {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &serde_json::json!({"oid": subject_of(PARTNER), "exp": chrono::Utc::now().timestamp() + 600}),
            &jsonwebtoken::EncodingKey::from_secret(b"not-the-firm-secret"),
        )
        .unwrap();
        format!("Bearer {token}")
    };
    let caller = firm
        .resolver
        .resolve(Some(forged.as_str()), &firm.store.snapshot());
    assert!(caller.identity().is_none());
    assert!(caller.context().is_err());
}
