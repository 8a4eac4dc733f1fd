use fellowship_accounting::{
    datetime::{self, MONTHS},
    dues::DuesRow,
    summary::{FinancialSummary, LedgerEntry},
};
use fellowship_announcements::feed::FeedPage;
use fellowship_data::{Announcement, Member};
use fellowship_finder::{highlight, FinderView, MemberDetails, Segment};

macro_rules! next_attr {
    ($old:ident, $new:ident, $attr:ident) => {
        if $old.$attr != $new.$attr {
            format!(" -> {}", $new.$attr)
        } else {
            "".to_string()
        }
    };
}

const MARK_START: &str = "\x1b[1;33m";
const MARK_END: &str = "\x1b[0m";

/// Join segments, matched ones in bold yellow.
pub fn render_highlighted(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.matched {
            out.push_str(MARK_START);
            out.push_str(segment.text);
            out.push_str(MARK_END);
        } else {
            out.push_str(segment.text);
        }
    }
    out
}

pub trait PrintFormatted {
    fn print_formatted(&self);
}

impl PrintFormatted for Member {
    fn print_formatted(&self) {
        println!("ID:\t\t\t{}", self.id);
        println!("Name:\t\t\t{}", self.name);
        println!("Member since:\t\t{}", self.created_at);
    }
}

impl PrintFormatted for (Member, Member) {
    fn print_formatted(&self) {
        let (old, new) = self;
        let next_name = next_attr!(old, new, name);
        println!("ID:\t\t\t{}", old.id);
        println!("Name:\t\t\t{}{}", old.name, next_name);
    }
}

impl PrintFormatted for Vec<Member> {
    fn print_formatted(&self) {
        println!("{:>4}\t{:<32}\t{}", "ID", "Name", "Member since");
        println!("{:-<64}", "-");
        for member in self {
            println!("{:>4}\t{:<32}\t{}", member.id, member.name, member.created_at);
        }
    }
}

impl PrintFormatted for Vec<DuesRow> {
    fn print_formatted(&self) {
        print!("{:>4}\t{:<24}", "ID", "Name");
        for month in MONTHS {
            print!("\t{}", month);
        }
        println!("\t{:>10}", "Total");
        println!("{:-<140}", "-");

        for row in self {
            print!("{:>4}\t{:<24}", row.member.id, row.member.name);
            for month in 1..=12 {
                let mark = if row.is_paid(month) { "x" } else { "." };
                print!("\t{}", mark);
            }
            println!("\t{:>10.2}", row.total());
        }
    }
}

fn print_entries(title: &str, entries: &[LedgerEntry]) {
    println!("");
    println!("{} ({})", title, entries.len());
    for entry in entries {
        println!(
            "{:>4}\t{}\t{:<24}\t{:<32}\t{:>12.2}",
            entry.id,
            entry.created_at,
            entry.member_name.as_deref().unwrap_or("-"),
            entry.description,
            entry.amount,
        );
    }
}

impl PrintFormatted for FinancialSummary {
    fn print_formatted(&self) {
        println!("Financial summary {}", self.year);
        println!("{:-<64}", "-");
        println!("Dues:\t\t\t{:>12.2}", self.total_dues);
        println!("Contributions:\t\t{:>12.2}", self.total_contributions());
        println!("Donations:\t\t{:>12.2}", self.total_donations());
        println!("Total income:\t\t{:>12.2}", self.total_income());
        println!("Total expenses:\t\t{:>12.2}", self.total_expenses());
        println!("Net balance:\t\t{:>12.2}", self.net_balance());

        print_entries("Contributions", &self.contributions);
        print_entries("Donations", &self.donations);
        print_entries("Expenses", &self.expenses);
    }
}

impl PrintFormatted for Announcement {
    fn print_formatted(&self) {
        let pin = if self.is_pinned { " [pinned]" } else { "" };
        println!("#{} {}{} ({} priority)", self.id, self.title, pin, self.priority);
        println!("Posted:\t\t\t{}", self.created_at);
        if let Some(sender) = &self.sender_name {
            println!("From:\t\t\t{}", sender);
        }
        if let Some(venue) = &self.venue {
            println!("Venue:\t\t\t{}", venue);
        }
        if let Some(date) = self.event_date {
            println!("Date:\t\t\t{}", date);
        }
        println!("");
        println!("{}", self.content);
    }
}

impl PrintFormatted for FeedPage {
    fn print_formatted(&self) {
        if self.announcements.is_empty() {
            println!("No announcements.");
            return;
        }
        for announcement in &self.announcements {
            announcement.print_formatted();
            println!("{:-<64}", "-");
        }
        if self.total_pages > 1 {
            println!("Page {} of {}", self.page + 1, self.total_pages);
        }
    }
}

pub trait PrintHighlighted {
    fn print_highlighted(&self, term: &str);
}

impl PrintHighlighted for MemberDetails {
    fn print_highlighted(&self, term: &str) {
        let name = render_highlighted(&highlight(&self.member.name, term.trim()));
        println!("{}\t{} Payments\t{} Contributions",
            name, self.payment_count(), self.contribution_count());

        if !self.monthly_dues.is_empty() {
            println!("  Monthly Dues");
            for due in &self.monthly_dues {
                println!("    {}\t{:>10.2}",
                    datetime::month_label(due.year, due.month), due.amount);
            }
        }
        if !self.contributions.is_empty() {
            println!("  Contributions");
            for contribution in &self.contributions {
                println!("    {}\t{:<32}\t{:>10.2}",
                    contribution.created_at, contribution.description, contribution.amount);
            }
        }
        if !self.donations.is_empty() {
            println!("  Donations");
            for donation in &self.donations {
                println!("    {}\t{:>10.2}", donation.created_at, donation.amount);
            }
        }
        println!("");
    }
}

impl PrintFormatted for FinderView {
    fn print_formatted(&self) {
        if !self.visible {
            return;
        }
        if self.is_no_match() {
            println!("No members found matching \"{}\"", self.term.trim());
            return;
        }
        for details in &self.results {
            details.print_highlighted(&self.term);
        }
    }
}
