//! Shared firm fixture for the workspace integration tests.
//!
//! Seeds a file-backed store through the public changeset API and mints
//! HS256 credentials the resolver accepts.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tempfile::TempDir;

use lawcorp::audit::{AuditEntry, Channel};
use lawcorp::identity::TokenValidator;
use lawcorp::model::{Client, ClientKind, PracticeGroup, PracticeGroupId};
use lawcorp::storage::Change;
use lawcorp::{
    Assignment, AssignmentRole, Caller, Case, CaseId, CaseStatus, Changeset, FirmRole, FirmStore,
    IdentityResolver, JsonFileStore, OperationContext, Person, PersonId,
};

pub const SECRET: &[u8] = b"integration-test-secret-0123456789";

pub const PARTNER: PersonId = PersonId(1);
pub const ASSOCIATE: PersonId = PersonId(2);
pub const COUNSEL: PersonId = PersonId(3);
pub const PARALEGAL: PersonId = PersonId(4);
pub const ASSISTANT: PersonId = PersonId(5);
pub const INTERN: PersonId = PersonId(6);
pub const FORMER: PersonId = PersonId(7);

/// Active, Associate is Lead; everyone but the partner is on it.
pub const ACTIVE_CASE: CaseId = CaseId(42);
/// Active, nobody assigned.
pub const UNSTAFFED_CASE: CaseId = CaseId(9);
/// Settled, everyone but the partner is on it.
pub const SETTLED_CASE: CaseId = CaseId(7);

pub const ACTIVE_MATTER: &str = "LC-2024-042";

pub struct Firm {
    pub dir: TempDir,
    pub store: JsonFileStore,
    pub resolver: IdentityResolver,
}

impl Firm {
    pub fn seeded() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::create(dir.path().join("firm.json")).unwrap();
        store.commit(seed_changeset()).unwrap();
        Self {
            dir,
            store,
            resolver: IdentityResolver::new(TokenValidator::hs256(SECRET)),
        }
    }

    /// Reopen the backing file, dropping every in-memory state.
    pub fn reopen(&self) -> JsonFileStore {
        JsonFileStore::open(self.store.path()).unwrap()
    }

    pub fn caller(&self, subject: &str) -> Caller {
        let authorization = bearer(subject);
        self.resolver
            .resolve(Some(authorization.as_str()), &self.store.snapshot())
    }

    pub fn ctx(&self, person: PersonId) -> OperationContext {
        self.caller(&subject_of(person)).context().unwrap()
    }

    pub fn audit_len(&self) -> usize {
        self.store.snapshot().audit.len()
    }
}

pub fn subject_of(person: PersonId) -> String {
    format!("oid-{}", person.0)
}

pub fn bearer(subject: &str) -> String {
    let claims = json!({"oid": subject, "exp": Utc::now().timestamp() + 600});
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
    format!("Bearer {token}")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn person(id: PersonId, first: &str, last: &str, role: FirmRole) -> Person {
    Person {
        id,
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}@lawcorp.example", first.to_lowercase()),
        role,
        practice_group_id: Some(PracticeGroupId(1)),
        supervisor_id: matches!(role, FirmRole::LegalAssistant | FirmRole::Intern)
            .then_some(ASSOCIATE),
        external_subject: Some(subject_of(id)),
        hire_date: date(2020, 9, 1),
        active: true,
        details: None,
    }
}

fn case(id: CaseId, number: &str, title: &str, status: CaseStatus) -> Case {
    Case {
        id,
        case_number: number.into(),
        title: title.into(),
        description: "Commercial dispute".into(),
        status,
        practice_group_id: PracticeGroupId(1),
        client_id: 1,
        court_name: Some("Superior Court".into()),
        judge_name: Some("Hon. R. Patel".into()),
        open_date: date(2024, 2, 1),
        close_date: (status == CaseStatus::Settled).then(|| date(2024, 6, 30)),
        estimated_value: 1_500_000.0,
        version: 0,
    }
}

fn assign(case_id: CaseId, person_id: PersonId, role: AssignmentRole) -> Change {
    Change::UpsertAssignment(Assignment {
        case_id,
        person_id,
        role,
        assigned_date: date(2024, 2, 2),
    })
}

fn seed_changeset() -> Changeset {
    let mut former = person(FORMER, "Jordan", "Lee", FirmRole::Associate);
    former.active = false;

    let mut changes = vec![
        Change::InsertPracticeGroup(PracticeGroup {
            id: PracticeGroupId(1),
            name: "Litigation".into(),
        }),
        Change::InsertClient(Client {
            id: 1,
            name: "Acme Corp".into(),
            kind: ClientKind::Organization,
            industry: Some("Manufacturing".into()),
        }),
        Change::InsertPerson(person(PARTNER, "Dana", "Whitfield", FirmRole::Partner)),
        Change::InsertPerson(person(ASSOCIATE, "Sam", "Ortiz", FirmRole::Associate)),
        Change::InsertPerson(person(COUNSEL, "Morgan", "Reyes", FirmRole::OfCounsel)),
        Change::InsertPerson(person(PARALEGAL, "Casey", "Nguyen", FirmRole::Paralegal)),
        Change::InsertPerson(person(ASSISTANT, "Riley", "Brooks", FirmRole::LegalAssistant)),
        Change::InsertPerson(person(INTERN, "Avery", "Chen", FirmRole::Intern)),
        Change::InsertPerson(former),
        Change::InsertCase(case(ACTIVE_CASE, ACTIVE_MATTER, "Acme v. Globex", CaseStatus::Active)),
        Change::InsertCase(case(UNSTAFFED_CASE, "LC-2024-009", "Acme v. Initech", CaseStatus::Active)),
        Change::InsertCase(case(SETTLED_CASE, "LC-2023-007", "Acme v. Hooli", CaseStatus::Settled)),
    ];
    for case_id in [ACTIVE_CASE, SETTLED_CASE] {
        changes.push(assign(case_id, ASSOCIATE, AssignmentRole::Lead));
        for person_id in [COUNSEL, PARALEGAL, ASSISTANT, INTERN] {
            changes.push(assign(case_id, person_id, AssignmentRole::Supporting));
        }
    }

    changes.into_iter().fold(Changeset::new(), Changeset::change).audit(
        AuditEntry::new("Seed", "Firm", "fixture", Channel::Cli).detail("Integration fixture."),
    )
}
