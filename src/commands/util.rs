use colored::*;
use modcompat::catalog::Stability;

/// One row under a boxed title: a `label: value` line or a label with
/// child entries.
pub enum TreeLine {
    Field(&'static str, String),
    List(&'static str, Vec<String>),
}

pub fn print_title(title: &str, styled: ColoredString) {
    let title_corner = boxy::Char::upper_left(boxy::Weight::Thick);
    let title_side_h = boxy::Char::horizontal(boxy::Weight::Thick).to_string();
    let title_side_v = boxy::Char::vertical(boxy::Weight::Thick);
    let title_branch = boxy::Char::right_tee(boxy::Weight::Thick).down(boxy::Weight::Normal);
    let width = title.chars().count() + 2;

    println!(
        "{}{}{}",
        title_corner,
        title_side_h.repeat(width),
        title_corner.rotate_cw(1)
    );
    println!("{} {} {}", title_side_v, styled, title_side_v);
    println!(
        "{}{}{}",
        title_branch,
        title_side_h.repeat(width),
        title_corner.rotate_cw(2)
    );
}

pub fn print_tree(lines: &[TreeLine]) {
    let left_branch_more_str = boxy::Char::right_tee(boxy::Weight::Normal).to_string();
    let left_branch_done_str = boxy::Char::lower_left(boxy::Weight::Normal).to_string();
    let left_node = boxy::Char::left_half(boxy::Weight::Normal);
    let down_branch_str = boxy::Char::down_tee(boxy::Weight::Normal).to_string();
    let branch_v = boxy::Char::vertical(boxy::Weight::Normal).to_string();

    let mut lines = lines.iter().peekable();
    while let Some(line) = lines.next() {
        let more = lines.peek().is_some();
        let branch = if more {
            &left_branch_more_str
        } else {
            &left_branch_done_str
        };
        match line {
            TreeLine::Field(label, value) => {
                println!("{}{}{} {}", branch, left_node, label.bold(), value);
            }
            TreeLine::List(label, items) => {
                println!(
                    "{}{}{}{}",
                    branch,
                    if items.is_empty() { "" } else { down_branch_str.as_str() },
                    left_node,
                    label.bold()
                );
                let mut items = items.iter().peekable();
                while let Some(item) = items.next() {
                    println!(
                        "{} {}{}{}",
                        if more { branch_v.as_str() } else { " " },
                        if items.peek().is_some() {
                            &left_branch_more_str
                        } else {
                            &left_branch_done_str
                        },
                        left_node,
                        item
                    );
                }
            }
        }
    }
}

pub fn stability_colored(stability: Stability) -> ColoredString {
    let text = format!("{:?}", stability);
    match stability {
        Stability::NotReviewed => text.normal(),
        Stability::Stable => text.green(),
        Stability::NotEnoughInformation | Stability::MinorIssues => text.yellow(),
        _ => text.red(),
    }
}
