use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use fellowship_db::Connection;
use fellowship_finder::{
    search,
    FinderConfig,
    FinderEvent,
    FinderStore,
    MemberFinder,
    Notification,
};

use crate::cli::Settings;
use crate::formatting::{PrintFormatted, PrintHighlighted};

#[derive(Args, Debug)]
pub struct SearchMembers {
    /// Part of the member name
    pub term: String,
    /// Print as JSON
    #[clap(long)]
    pub json: bool,
}

impl SearchMembers {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let results = search(db, &self.term).await?;
        if results.dropped > 0 {
            eprintln!("warning: could not load {} matching member(s)", results.dropped);
        }
        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }
        if results.is_empty() {
            println!("No members found matching \"{}\"", self.term.trim());
            return Ok(());
        }
        for details in &results.members {
            details.print_highlighted(&results.term);
        }
        Ok(())
    }
}

/// Interactive search. Every line read from stdin replaces the
/// search term, an empty line clears it.
#[derive(Args, Debug)]
pub struct FindMembers {}

impl FindMembers {
    pub async fn run(self, db: Connection, settings: &Settings) -> Result<()> {
        let (mut finder, mut events) = MemberFinder::new(
            Arc::new(db),
            FinderConfig {
                quiet_interval: settings.debounce,
            },
        );
        eprintln!("Search members... (empty line clears, Ctrl-D quits)");
        let stdin = BufReader::new(tokio::io::stdin());
        interact(&mut finder, &mut events, stdin).await
    }
}

/// Feed each line of `input` to the finder and print what it
/// shows. When the input ends, the last scheduled search still
/// runs and is shown.
pub async fn interact<DB, R>(
    finder: &mut MemberFinder<DB>,
    events: &mut mpsc::UnboundedReceiver<FinderEvent>,
    input: R,
) -> Result<()>
where
    DB: FinderStore + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => finder.clear().await,
                Some(line) => finder.input(&line).await,
                None => break,
            },
            Some(event) = events.recv() => show_event(finder, event).await,
        }
    }

    finder.settle().await;
    while let Ok(event) = events.try_recv() {
        show_event(finder, event).await;
    }
    Ok(())
}

async fn show_event<DB>(finder: &MemberFinder<DB>, event: FinderEvent)
where
    DB: FinderStore + 'static,
{
    match event {
        FinderEvent::Displayed { .. } => {
            finder.view().await.print_formatted();
        }
        FinderEvent::Notify(Notification::Error(message)) => {
            eprintln!("error: {}", message);
        }
        FinderEvent::Notify(Notification::Warning(message)) => {
            eprintln!("warning: {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    use fellowship_data::{Insert, Member};
    use fellowship_finder::FinderState;

    async fn finder_with_members(
        names: &[&str],
    ) -> (MemberFinder<Connection>, mpsc::UnboundedReceiver<FinderEvent>) {
        let db = Connection::open_test().await.unwrap();
        for name in names {
            db.insert(Member {
                name: name.to_string(),
                ..Default::default()
            }).await.unwrap();
        }
        MemberFinder::new(Arc::new(db), FinderConfig {
            quiet_interval: Duration::from_millis(20),
        })
    }

    #[tokio::test]
    async fn test_interact_shows_last_search_at_end_of_input() {
        let (mut finder, mut events) =
            finder_with_members(&["Abraham", "Sarah"]).await;

        interact(&mut finder, &mut events, &b"ab\nabr\n"[..]).await.unwrap();

        let view = finder.view().await;
        assert_eq!(view.state, FinderState::Displayed);
        assert_eq!(view.term, "abr");
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].member.name, "Abraham");
    }

    #[tokio::test]
    async fn test_interact_empty_line_clears() {
        let (mut finder, mut events) =
            finder_with_members(&["Abraham"]).await;

        interact(&mut finder, &mut events, &b"abr\n\n"[..]).await.unwrap();

        let view = finder.view().await;
        assert_eq!(view.state, FinderState::Idle);
        assert!(view.results.is_empty());
        assert!(!view.visible);
    }
}
