//! HTML rendering for the admin page
//!
//! The admin page is a fragment: a script block with one submit function
//! per action, the shared `AdminForm` and the broadcast form. It expects the
//! surrounding document to provide the raid selector form, which
//! [`render_document`] does.

use crate::action::{
    ADMIN_FORM, AdminAction, MAX_FILE_SIZE, MESSAGE_FORM, RaidIdSource, SELECTOR_FORM, field,
};
use crate::error::{AdminError, Result};
use crate::html::{EOL, escape};
use crate::message::{MessageKind, SUBJECT_PROMPT, TEXT_PROMPT};
use crate::page::PageContext;
use crate::raid::{Raid, RaidId};

/// A button on the admin form
#[derive(Debug, Clone, Copy)]
pub struct AdminButton {
    pub action: AdminAction,
    pub name: &'static str,
    pub label: &'static str,
    pub tab_index: u32,
}

/// Buttons of the admin form in display order
///
/// `ClearTables` has a submit function but no button.
pub const ADMIN_BUTTONS: [AdminButton; 6] = [
    AdminButton {
        action: AdminAction::Json,
        name: "JSONdump",
        label: "Получить дамп",
        tab_index: 101,
    },
    AdminButton {
        action: AdminAction::LoadRaidDataFile,
        name: "LoadRaidDataFileButton",
        label: "Загрузить",
        tab_index: 102,
    },
    AdminButton {
        action: AdminAction::RecalcRaidResults,
        name: "RecalcRaidResultsButton",
        label: "Пересчитать результаты",
        tab_index: 103,
    },
    AdminButton {
        action: AdminAction::FindRaidErrors,
        name: "FindRaidErrorsButton",
        label: "Найти ошибки",
        tab_index: 104,
    },
    AdminButton {
        action: AdminAction::RecalcRaidRank,
        name: "RecalcRaidRankButton",
        label: "Пересчитать рейтинг",
        tab_index: 105,
    },
    AdminButton {
        action: AdminAction::RecalcAllRaidsRank,
        name: "RecalcAllRaidsRankButton",
        label: "Пересчитать рейтинг всех марш-бросков",
        tab_index: 106,
    },
];

const ROW_STYLE: &str = "padding-top: 5px; padding-bottom: 5px;";
const BUTTON_STYLE: &str = "width:185px;";

/// Render the admin page fragment
///
/// # Errors
///
/// - `MissingScript` when the context has no script URL to post to
/// - `AccessDenied` when the viewer is neither administrator nor moderator;
///   nothing is rendered in that case
pub fn render_admin_page(context: &PageContext) -> Result<String> {
    if context.script_url.trim().is_empty() {
        return Err(AdminError::MissingScript);
    }
    if !context.viewer.can_administer() {
        return Err(AdminError::access_denied());
    }

    let mut out = String::new();
    if let Some(message) = &context.short_result {
        push_short_result(&mut out, message);
    }
    out.push_str(&submit_script());
    push_admin_form(&mut out, context);
    push_message_form(&mut out, context);
    Ok(out)
}

/// JavaScript submit functions for every posted action
pub fn submit_script() -> String {
    let mut out = String::new();
    out.push_str("<script type=\"text/javascript\">");
    out.push_str(EOL);
    for action in AdminAction::SUBMITTED {
        out.push_str(&submit_function(action));
    }
    out.push_str("</script>");
    out.push_str(EOL);
    out
}

fn submit_function(action: AdminAction) -> String {
    let form = action.form();
    let mut body = format!(
        "    document.{form}.{}.value = \"{}\";{EOL}",
        field::ACTION,
        action.as_str()
    );
    match action.raid_id_source() {
        RaidIdSource::Selector => body.push_str(&format!(
            "    document.{form}.{id}.value = document.{SELECTOR_FORM}.{id}.value;{EOL}",
            id = field::RAID_ID
        )),
        RaidIdSource::AllRaids => body.push_str(&format!(
            "    document.{form}.{}.value = {};{EOL}",
            field::RAID_ID,
            RaidId::ALL
        )),
        RaidIdSource::Unchanged => {}
    }
    body.push_str(&format!("    document.{form}.submit();{EOL}"));
    body.push_str(&format!("    return true;{EOL}"));

    format!("function {}(){EOL}{{{EOL}{body}}}{EOL}", action.function_name())
}

fn push_short_result(out: &mut String, message: &str) {
    let lines: Vec<String> = message.lines().map(escape).collect();
    out.push_str(&format!(
        "<div class=\"short_result\" style=\"margin-bottom: 10px;\">{}</div>{EOL}",
        lines.join("<br/>")
    ));
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">{EOL}",
        name,
        escape(value)
    )
}

fn onclick(action: AdminAction) -> String {
    format!("javascript: {}();", action.function_name())
}

fn push_admin_form(out: &mut String, context: &PageContext) {
    let raid_id = context.raid_id.to_string();

    out.push_str(&format!(
        "<form name=\"{ADMIN_FORM}\" enctype=\"multipart/form-data\" action=\"{}\" method=\"post\">{EOL}",
        escape(&context.script_url)
    ));
    out.push_str(&hidden(field::RAID_ID, &raid_id));
    out.push_str(&hidden(field::ACTION, ""));
    out.push_str(&hidden(field::MAX_FILE_SIZE, &MAX_FILE_SIZE.to_string()));
    out.push_str(&format!(
        "<table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" width=\"100%\">{EOL}"
    ));

    out.push_str(&format!(
        "<tr><td style=\"{ROW_STYLE}\"><a href=\"?{}={}&amp;{}={}\" target=\"_blank\">Список для печати</a></td></tr>{EOL}",
        field::ACTION,
        AdminAction::PrintRaidTeams,
        field::RAID_ID,
        raid_id
    ));

    for button in &ADMIN_BUTTONS {
        let input = format!(
            "<input type=\"button\" style=\"{BUTTON_STYLE}\" name=\"{}\" value=\"{}\" onclick=\"{}\" tabindex=\"{}\">",
            button.name,
            escape(button.label),
            onclick(button.action),
            button.tab_index
        );
        if button.action == AdminAction::LoadRaidDataFile {
            out.push_str(&format!(
                "<tr><td style=\"padding-top: 10px; padding-bottom: 10px;\">Файл с данными:<br/><input type=\"file\" name=\"{}\"> &nbsp; {input}</td></tr>{EOL}",
                field::DATA_FILE
            ));
        } else {
            out.push_str(&format!("<tr><td style=\"{ROW_STYLE}\">{input}</td></tr>{EOL}"));
        }
    }

    out.push_str(&format!("</table></form>{EOL}"));
}

fn push_message_form(out: &mut String, context: &PageContext) {
    let mut tab_index = context.tab_index;
    let mut next_tab = || {
        tab_index += 1;
        tab_index
    };

    out.push_str(&format!(
        "<div style=\"margin-top: 30px; margin-bottom: 10px; text-align: left\">Рассылка для всех участников!</div>{EOL}"
    ));
    out.push_str(&format!(
        "<form name=\"{MESSAGE_FORM}\" action=\"{}\" method=\"post\">{EOL}",
        escape(&context.script_url)
    ));
    out.push_str(&hidden(field::ACTION, ""));
    out.push_str(&hidden(field::RAID_ID, &context.raid_id.to_string()));

    out.push_str(&format!(
        "<select name=\"{}\" class=\"leftmargin\" tabindex=\"{}\">{EOL}",
        field::MESSAGE_KIND,
        next_tab()
    ));
    for kind in MessageKind::ALL {
        let selected = if kind == MessageKind::default() {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>{EOL}",
            kind.form_value(),
            kind.label()
        ));
    }
    out.push_str(&format!("</select>{EOL}"));

    out.push_str(&format!(
        "<input type=\"text\" name=\"{}\" size=\"30\" value=\"{subject}\" tabindex=\"{}\" placeholder=\"{subject}\" title=\"{subject}\">{EOL}",
        field::MESSAGE_SUBJECT,
        next_tab(),
        subject = escape(SUBJECT_PROMPT)
    ));
    out.push_str(&format!(
        "<div class=\"team_res\"><textarea name=\"{}\" rows=\"4\" cols=\"50\" tabindex=\"{}\" title=\"{text}\">{text}</textarea></div>{EOL}",
        field::MESSAGE_TEXT,
        next_tab(),
        text = escape(TEXT_PROMPT)
    ));
    out.push_str(&format!(
        "<br/><input type=\"button\" onclick=\"{}\" name=\"SendMessageForAllButton\" value=\"Отправить\" tabindex=\"{}\">{EOL}",
        onclick(AdminAction::SendMessageForAll),
        next_tab()
    ));
    out.push_str(&format!("</form>{EOL}"));
}

/// Raids offered by the selector form of the surrounding document
#[derive(Debug, Clone)]
pub struct RaidSelector {
    pub script_url: String,
    pub raids: Vec<(RaidId, String)>,
    pub selected: RaidId,
}

impl RaidSelector {
    fn render(&self) -> String {
        let mut out = format!(
            "<form name=\"{SELECTOR_FORM}\" action=\"{}\" method=\"get\">{EOL}",
            escape(&self.script_url)
        );
        out.push_str(&format!(
            "<select name=\"{}\" onchange=\"document.{SELECTOR_FORM}.submit();\">{EOL}",
            field::RAID_ID
        ));
        if self.raids.iter().all(|(id, _)| *id != self.selected) {
            out.push_str(&format!(
                "<option value=\"{}\" selected>-</option>{EOL}",
                self.selected
            ));
        }
        for (id, name) in &self.raids {
            let selected = if *id == self.selected { " selected" } else { "" };
            out.push_str(&format!(
                "<option value=\"{id}\"{selected}>{}</option>{EOL}",
                escape(name)
            ));
        }
        out.push_str(&format!("</select>{EOL}</form>{EOL}"));
        out
    }
}

/// Wrap a page fragment in a complete document with the raid selector
pub fn render_document(title: &str, selector: &RaidSelector, body: &str) -> String {
    format!(
        "<!DOCTYPE html>{EOL}<html lang=\"ru\">{EOL}<head>{EOL}<meta charset=\"utf-8\">{EOL}<title>{title}</title>{EOL}</head>{EOL}<body>{EOL}{selector}{body}</body>{EOL}</html>{EOL}",
        title = escape(title),
        selector = selector.render(),
    )
}

/// Printable list of a raid's teams
pub fn render_print_page(raid: &Raid) -> String {
    let mut rows = String::new();
    for team in &raid.teams {
        let result = team
            .result_minutes
            .map(format_minutes)
            .unwrap_or_else(|| "-".to_string());
        let rank = team
            .rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{result}</td><td>{rank}</td></tr>{EOL}",
            team.number,
            escape(&team.name),
            escape(&team.members.join(", ")),
        ));
    }

    format!(
        "<!DOCTYPE html>{EOL}<html lang=\"ru\">{EOL}<head>{EOL}<meta charset=\"utf-8\">{EOL}<title>{name}</title>{EOL}</head>{EOL}<body>{EOL}<h1>{name}</h1>{EOL}<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">{EOL}<tr><th>Номер</th><th>Команда</th><th>Участники</th><th>Результат</th><th>Место</th></tr>{EOL}{rows}</table>{EOL}</body>{EOL}</html>{EOL}",
        name = escape(&raid.name),
    )
}

fn format_minutes(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
