//! The `rehearse roles` command.

use std::path::PathBuf;

use anyhow::Result;

use rehearse_capture::config::load_config_from;
use rehearse_core::bank::load_bank;
use rehearse_core::model::JOB_ROLES;

pub fn execute(questions: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    use comfy_table::{Cell, Table};

    let bank = match &questions {
        Some(path) => load_bank(path)?,
        None => load_config_from(config_path.as_deref())?.question_bank()?,
    };

    let mut table = Table::new();
    table.set_header(vec!["Role", "Question set", "Questions"]);

    // The selectable roles first, then any extra roles the bank defines.
    let mut roles: Vec<&str> = JOB_ROLES.to_vec();
    roles.extend(
        bank.roles()
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| !JOB_ROLES.contains(name)),
    );

    for role in roles {
        let set = if bank.has_role(role) {
            "dedicated"
        } else {
            "general"
        };
        table.add_row(vec![
            Cell::new(role),
            Cell::new(set),
            Cell::new(bank.questions_for(role).len()),
        ]);
    }

    println!("{table}");
    Ok(())
}
