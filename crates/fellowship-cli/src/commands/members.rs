use anyhow::Result;
use clap::{Args, Subcommand};
use inquire::Confirm;

use fellowship_accounting::roster;
use fellowship_data::{Member, MemberFilter, Query, Retrieve};
use fellowship_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Members {
    /// List members
    #[clap(name="list")]
    List(ListMembers),
    /// Add a member
    #[clap(name="add")]
    Add(AddMember),
    /// Change the name of a member
    #[clap(name="rename")]
    Rename(RenameMember),
    /// Delete a member with all records
    #[clap(name="delete")]
    Delete(DeleteMember),
    /// Show the number of members
    #[clap(name="count")]
    Count,
}

impl Members {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Members::List(cmd) => cmd.run(db).await,
            Members::Add(cmd) => cmd.run(db).await,
            Members::Rename(cmd) => cmd.run(db).await,
            Members::Delete(cmd) => cmd.run(db).await,
            Members::Count => {
                let count = roster::member_count(db).await?;
                println!("{} members.", count);
                Ok(())
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct ListMembers {
    /// Only members whose name contains this
    #[clap(short, long)]
    pub name: Option<String>,
}

impl ListMembers {
    /// Run the command and list members
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = MemberFilter{
            name: self.name,
            ..Default::default()
        };

        let members: Vec<Member> = db.query(&filter).await?;
        println!("{} members.", members.len());
        members.print_formatted();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddMember{
    #[clap(short, long)]
    pub name: String,
}

impl AddMember {
    /// Run the command and add a member to the database
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member = roster::add_member(db, &self.name).await?;
        println!("Member added with id {}.", member.id);
        Ok(())
    }
}


#[derive(Args, Debug)]
pub struct RenameMember{
    #[clap(short, long)]
    pub id: i64,
    #[clap(short, long)]
    pub name: String,
}

impl RenameMember {
    /// Run command and update a member
    pub async fn run(self, db: &Connection) -> Result<()> {
        let old: Member = db.retrieve(self.id).await?;
        let new = roster::rename_member(db, self.id, &self.name).await?;
        println!("");
        (old, new).print_formatted();
        println!("");
        Ok(())
    }
}


#[derive(Args, Debug)]
pub struct DeleteMember{
    #[clap(short, long)]
    pub id: i64,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}


impl DeleteMember {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.id).await?;
        println!("");
        member.print_formatted();
        println!("");
        if !self.yes {
            let confirm = Confirm::new(
                "Delete member with all dues and contributions? This cannot be undone.")
                .with_default(false);
            if !confirm.prompt()? {
                return Ok(());
            }
        }
        roster::delete_member(db, member.id).await?;
        println!("Member deleted.");
        Ok(())
    }
}
