use raidadmin::{
    ACCESS_DENIED_MESSAGE, AdminAction, AdminError, PageContext, Raid, RaidId, RaidSelector, Role,
    Team, Viewer, render_admin_page, render_document, render_print_page,
};

fn admin_context(raid_id: u64) -> PageContext {
    PageContext::builder("/admin")
        .raid(RaidId(raid_id))
        .viewer(Viewer::new("root", Role::Administrator))
        .build()
}

#[test]
fn test_participant_gets_no_form() {
    let context = PageContext::builder("/admin")
        .raid(RaidId(3))
        .viewer(Viewer::new("runner", Role::Participant))
        .build();

    match render_admin_page(&context) {
        Err(AdminError::AccessDenied { message }) => assert_eq!(message, ACCESS_DENIED_MESSAGE),
        other => panic!("expected access denied, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn test_missing_script_url_renders_nothing() {
    let context = PageContext::builder("  ")
        .viewer(Viewer::new("root", Role::Administrator))
        .build();

    assert!(matches!(
        render_admin_page(&context),
        Err(AdminError::MissingScript)
    ));
}

#[test]
fn test_moderator_sees_forms() {
    let context = PageContext::builder("/admin")
        .raid(RaidId(5))
        .viewer(Viewer::new("mod", Role::Moderator))
        .build();

    let html = render_admin_page(&context).unwrap();
    assert!(html.contains("<form name=\"AdminForm\" enctype=\"multipart/form-data\" action=\"/admin\" method=\"post\">"));
    assert!(html.contains("<form name=\"SendMessageForAllForm\" action=\"/admin\" method=\"post\">"));
}

#[test]
fn test_hidden_raid_id_matches_context() {
    let html = render_admin_page(&admin_context(42)).unwrap();

    assert!(html.contains("<input type=\"hidden\" name=\"RaidId\" value=\"42\">"));
    assert!(html.contains("?action=PrintRaidTeams&amp;RaidId=42"));
    assert!(html.contains("<input type=\"hidden\" name=\"MAX_FILE_SIZE\" value=\"1000000\">"));
    assert!(!html.contains("value=\"41\""));
}

#[test]
fn test_every_button_submits_its_action() {
    let html = render_admin_page(&admin_context(1)).unwrap();

    for action in AdminAction::SUBMITTED {
        let function = format!("function {}()", action.function_name());
        let start = html
            .find(&function)
            .unwrap_or_else(|| panic!("missing function for {}", action));
        let body = &html[start..];
        let end = body.find("\r\n}").unwrap();
        let expected = format!(
            "document.{}.action.value = \"{}\";",
            action.form(),
            action.as_str()
        );
        assert!(body[..end].contains(&expected), "{} sets wrong action", action);
    }

    for action in [
        AdminAction::Json,
        AdminAction::LoadRaidDataFile,
        AdminAction::RecalcRaidResults,
        AdminAction::FindRaidErrors,
        AdminAction::RecalcRaidRank,
        AdminAction::RecalcAllRaidsRank,
        AdminAction::SendMessageForAll,
    ] {
        let onclick = format!("onclick=\"javascript: {}();\"", action.function_name());
        assert!(html.contains(&onclick), "no button for {}", action);
    }
    assert!(!html.contains("onclick=\"javascript: ClearTables();\""));
}

#[test]
fn test_message_form_tab_indexes_follow_layout() {
    let context = PageContext::builder("/admin")
        .viewer(Viewer::new("root", Role::Administrator))
        .tab_index(10)
        .build();
    let html = render_admin_page(&context).unwrap();

    assert!(html.contains("<select name=\"SendForAllTypeId\" class=\"leftmargin\" tabindex=\"11\">"));
    assert!(html.contains("<option value=\"1\" selected>обычная</option>"));
    assert!(html.contains("<option value=\"2\">экстренная</option>"));
    assert!(html.contains("name=\"MessageSubject\" size=\"30\" value=\"Тема рассылки\" tabindex=\"12\""));
    assert!(html.contains("<textarea name=\"MessageText\" rows=\"4\" cols=\"50\" tabindex=\"13\""));
    assert!(html.contains("value=\"Отправить\" tabindex=\"14\""));
}

#[test]
fn test_lines_end_with_crlf() {
    let html = render_admin_page(&admin_context(1)).unwrap();
    for (idx, _) in html.match_indices('\n') {
        assert_eq!(&html[idx - 1..idx], "\r");
    }
}

#[test]
fn test_short_result_is_escaped() {
    let context = PageContext::builder("/admin")
        .viewer(Viewer::new("root", Role::Administrator))
        .short_result("<b>готово</b>\nвторая строка")
        .build();
    let html = render_admin_page(&context).unwrap();

    assert!(html.contains("&lt;b&gt;готово&lt;/b&gt;<br/>вторая строка"));
}

#[test]
fn test_script_url_is_escaped() {
    let context = PageContext::builder("/admin?x=\"><script>")
        .viewer(Viewer::new("root", Role::Administrator))
        .build();
    let html = render_admin_page(&context).unwrap();

    assert!(!html.contains("\"><script>"));
    assert!(html.contains("action=\"/admin?x=&quot;&gt;&lt;script&gt;\""));
}

#[test]
fn test_document_contains_selector() {
    let selector = RaidSelector {
        script_url: "/admin".to_string(),
        raids: vec![(RaidId(1), "Весна".to_string()), (RaidId(2), "Осень".to_string())],
        selected: RaidId(2),
    };
    let body = render_admin_page(&admin_context(2)).unwrap();
    let html = render_document("Администрирование", &selector, &body);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<form name=\"FindTeamForm\" action=\"/admin\" method=\"get\">"));
    assert!(html.contains("<option value=\"2\" selected>Осень</option>"));
    assert!(html.contains("<option value=\"1\">Весна</option>"));
    assert!(html.find("FindTeamForm").unwrap() < html.find("AdminForm").unwrap());
}

#[test]
fn test_print_page_lists_teams() {
    let mut raid = Raid::new(1, "Весна").with_teams(vec![
        Team::new(11, "Ежи & Co").with_members(["Аня", "Петя"]).finished(605, 0),
        Team::new(12, "Лоси").with_members(["Оля"]),
    ]);
    raid.recalculate_rank();

    let html = render_print_page(&raid);
    assert!(html.contains("<tr><td>11</td><td>Ежи &amp; Co</td><td>Аня, Петя</td><td>10:05</td><td>1</td></tr>"));
    assert!(html.contains("<tr><td>12</td><td>Лоси</td><td>Оля</td><td>-</td><td>-</td></tr>"));
}
