use anyhow::Result;
use tracing::info;

use fellowship_data::{
    Delete,
    Insert,
    Member,
    MemberFilter,
    Query,
    Retrieve,
    Update,
};

use crate::Error;

/// Trim a member name and reject blank ones.
pub fn validate_name(name: &str) -> Result<&str, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(name)
}

/// Fail if another member already carries the name,
/// ignoring case.
async fn ensure_unique<DB>(db: &DB, name: &str, except: Option<i64>) -> Result<()>
where
    DB: Query<Member, Filter = MemberFilter> + Sync,
{
    let members: Vec<Member> = db.query(&MemberFilter {
        name: Some(name.to_string()),
        ..Default::default()
    }).await?;
    let duplicate = members
        .iter()
        .any(|m| Some(m.id) != except && m.has_name(name));
    if duplicate {
        return Err(Error::DuplicateName(name.to_string()).into());
    }
    Ok(())
}

/// Add a member to the roster
pub async fn add_member<DB>(db: &DB, name: &str) -> Result<Member>
where
    DB: Query<Member, Filter = MemberFilter> + Insert<Member> + Sync,
{
    let name = validate_name(name)?;
    ensure_unique(db, name, None).await?;

    let member = db.insert(Member {
        name: name.to_string(),
        ..Default::default()
    }).await?;
    info!(id = member.id, name = %member.name, "member added");
    Ok(member)
}

/// Change the name of a member
pub async fn rename_member<DB>(db: &DB, id: i64, name: &str) -> Result<Member>
where
    DB: Query<Member, Filter = MemberFilter>
        + Retrieve<Member, Key = i64>
        + Update<Member>
        + Sync,
{
    let name = validate_name(name)?;
    let member: Member = db.retrieve(id).await?;
    ensure_unique(db, name, Some(member.id)).await?;

    let member = db.update(Member {
        name: name.to_string(),
        ..member
    }).await?;
    info!(id = member.id, name = %member.name, "member renamed");
    Ok(member)
}

/// Remove a member together with all of their records.
/// Returns the removed member.
pub async fn delete_member<DB>(db: &DB, id: i64) -> Result<Member>
where
    DB: Retrieve<Member, Key = i64> + Delete<Member> + Sync,
{
    let member: Member = db.retrieve(id).await?;
    db.delete(member.clone()).await?;
    info!(id = member.id, name = %member.name, "member deleted");
    Ok(member)
}

pub async fn member_count<DB>(db: &DB) -> Result<usize>
where
    DB: Query<Member, Filter = MemberFilter> + Sync,
{
    let members: Vec<Member> = db.query(&MemberFilter::default()).await?;
    Ok(members.len())
}
