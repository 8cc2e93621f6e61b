//! Fixtures shared by the ledger handler tests.

use std::sync::Arc;

use crate::adapters::memory::InMemoryLedgerStore;
use crate::domain::foundation::{CommandMetadata, MemberId, Money, ProjectId, UserId};
use crate::domain::ledger::{NewMember, NewPayment, Payment, Project};
use crate::ports::LedgerStore;

pub const OWNER: &str = "U-owner";
pub const BOB: &str = "U-bob";
pub const CAROL: &str = "U-carol";
pub const STRANGER: &str = "U-stranger";

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn member_id(id: &str) -> MemberId {
    MemberId::new(id).unwrap()
}

pub fn meta(id: &str) -> CommandMetadata {
    CommandMetadata::test_fixture(id)
}

pub struct Fixture {
    pub store: Arc<InMemoryLedgerStore>,
    pub project: Project,
}

impl Fixture {
    pub fn store_dyn(&self) -> Arc<dyn LedgerStore> {
        self.store.clone()
    }

    pub fn project_id(&self) -> ProjectId {
        self.project.id
    }

    pub async fn payment(&self, payer: &str, amount: i64, participants: Option<&[&str]>) -> Payment {
        let new = NewPayment::new(
            member_id(payer),
            Money::from_minor(amount),
            None,
            participants.map(|p| p.iter().map(|s| member_id(s)).collect()),
        )
        .unwrap();
        self.store.add_payment(&self.project.id, new).await.unwrap()
    }

    pub async fn current_project(&self) -> Project {
        self.store.get_project(&self.project.id).await.unwrap().unwrap()
    }
}

/// A project owned by `OWNER` with linked members `BOB` and `CAROL`.
pub async fn project_with_members() -> Fixture {
    let store = Arc::new(InMemoryLedgerStore::new());
    let owner = NewMember::linked(user(OWNER), "Alice").unwrap();
    let project = store.create_project(&owner, "Weekend trip").await.unwrap();
    for (id, name) in [(BOB, "Bob"), (CAROL, "Carol")] {
        store
            .add_member(&project.id, NewMember::linked(user(id), name).unwrap())
            .await
            .unwrap();
    }
    let project = store.get_project(&project.id).await.unwrap().unwrap();
    Fixture { store, project }
}
