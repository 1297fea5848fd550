//! Text renderings of the simulated artifacts (emails, chats, logs...).

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::content::types::{
    Alert, Browser, Chat, CodeView, ConfigView, Email, Generic, Logs, Phone, PopupStyle,
    SettingStatus, Sms, SmsDirection, Ticket, UserType,
};
use crate::content::ScenarioContent;

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn danger() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

fn text_block(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.lines().map(Line::raw)
}

pub fn artifact_lines(content: &ScenarioContent) -> Vec<Line<'_>> {
    match content {
        ScenarioContent::Email(c) => email(c),
        ScenarioContent::Chat(c) => chat(c),
        ScenarioContent::Sms(c) => sms(c),
        ScenarioContent::Browser(c) => browser(c),
        ScenarioContent::Phone(c) => phone(c),
        ScenarioContent::Ticket(c) => ticket(c),
        ScenarioContent::Logs(c) => logs(c),
        ScenarioContent::Alert(c) => alert(c),
        ScenarioContent::Config(c) => config(c),
        ScenarioContent::Code(c) => code(c),
        ScenarioContent::Generic(c) => generic(c),
    }
}

fn email(c: &Email) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    if let Some(warning) = &c.warning {
        lines.push(Line::styled(format!("⚠️  {warning}"), danger()));
    }
    lines.push(Line::styled(c.subject.as_str(), bold()));
    let sender_style = if c.from.external {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    };
    lines.push(Line::from(vec![
        Span::raw("From: "),
        Span::styled(c.from.name.as_str(), sender_style),
        Span::styled(format!(" <{}>", c.from.email), dim()),
    ]));
    if let Some(time) = &c.time {
        lines.push(Line::styled(time.as_str(), dim()));
    }
    lines.push(Line::raw(format!("To: {}", c.to.as_deref().unwrap_or("me"))));
    lines.push(Line::raw(""));
    lines.extend(text_block(&c.body));
    if let Some(attachment) = &c.attachment {
        let style = if attachment.suspicious {
            danger()
        } else {
            Style::default()
        };
        lines.push(Line::raw(""));
        lines.push(Line::styled(format!("📎 {}", attachment.name), style));
    }
    if let Some(headers) = &c.headers {
        lines.push(Line::raw(""));
        lines.push(Line::styled(headers.as_str(), dim()));
    }
    lines
}

fn chat(c: &Chat) -> Vec<Line<'_>> {
    let mut lines = vec![Line::styled(format!("# {}", c.channel), bold())];
    for m in &c.messages {
        let mut header = vec![Span::styled(m.user.as_str(), bold())];
        if m.user_type == UserType::External {
            header.push(Span::styled(" EXTERNAL", danger()));
        }
        header.push(Span::styled(format!("  {}", m.time), dim()));
        lines.push(Line::from(header));
        lines.push(Line::raw(format!("  {}", m.text)));
    }
    lines
}

fn sms(c: &Sms) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Unknown ", bold()),
        Span::styled(c.number.as_str(), dim()),
    ])];
    for m in &c.messages {
        let prefix = match m.direction {
            SmsDirection::Received => "◀ ",
            SmsDirection::Sent => "▶ ",
        };
        lines.push(Line::raw(format!("{prefix}{}", m.text)));
        if let Some(time) = &m.time {
            lines.push(Line::styled(format!("  {time}"), dim()));
        }
    }
    lines
}

fn browser(c: &Browser) -> Vec<Line<'_>> {
    let (lock, lock_style) = if c.secure {
        ("🔒 ", Style::default().fg(Color::Green))
    } else {
        ("⚠️ ", danger())
    };
    let domain_style = if c.suspicious_domain {
        danger()
    } else {
        Style::default()
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(lock, lock_style),
        Span::raw("https://"),
        Span::styled(c.shown_domain(), domain_style),
        Span::raw("/"),
    ])];
    lines.push(Line::raw(""));
    if let Some(form) = &c.login_form {
        lines.push(Line::styled(format!("[{}]", form.logo), bold()));
        lines.push(Line::styled(form.title.as_str(), bold()));
        if let Some(subtitle) = &form.subtitle {
            lines.push(Line::raw(subtitle.as_str()));
        }
        lines.push(Line::styled("Email:    ____________", dim()));
        lines.push(Line::styled("Password: ____________", dim()));
        lines.push(Line::raw("[ Sign in ]"));
    } else if let Some(popup) = &c.popup {
        let icon = match popup.style {
            PopupStyle::Danger => "⚠️",
            PopupStyle::Info => "ℹ️",
        };
        lines.push(Line::styled(format!("{icon} {}", popup.title), bold()));
        lines.push(Line::raw(popup.message.as_str()));
        let buttons: Vec<String> = popup.buttons.iter().map(|b| format!("[ {b} ]")).collect();
        lines.push(Line::raw(buttons.join(" ")));
    }
    lines
}

fn phone(c: &Phone) -> Vec<Line<'_>> {
    let mut lines = vec![Line::styled(format!("📞 {}", c.caller), bold())];
    lines.extend(
        text_block(&c.transcript)
            .map(|l| l.style(Style::default().add_modifier(Modifier::ITALIC))),
    );
    lines
}

fn ticket(c: &Ticket) -> Vec<Line<'_>> {
    let priority_style = match c.priority.to_lowercase().as_str() {
        "urgent" | "critical" | "high" => danger(),
        _ => Style::default().fg(Color::Yellow),
    };
    vec![
        Line::from(vec![
            Span::styled(c.ticket_id.as_str(), dim()),
            Span::raw("  "),
            Span::styled(c.title.as_str(), bold()),
        ]),
        Line::from(vec![Span::raw("Priority: "), Span::styled(c.priority.as_str(), priority_style)]),
        Line::raw(format!("Requester: {} ({})", c.requester.name, c.requester.role)),
        Line::raw(format!("Assigned: {}", c.manager.as_deref().unwrap_or("You"))),
        Line::raw(""),
        Line::raw(c.details.as_str()),
    ]
}

fn logs(c: &Logs) -> Vec<Line<'_>> {
    let mut lines = vec![Line::styled(
        format!("{:<10} {:<16} {:<18} {}", "TIME", "EVENT", "USER/SRC", "DETAILS"),
        Style::default().fg(Color::Cyan),
    )];
    for entry in &c.entries {
        let style = if entry.event.contains("SUCCESS") {
            danger()
        } else {
            Style::default().fg(Color::Green)
        };
        lines.push(Line::styled(
            format!(
                "{:<10} {:<16} {:<18} {}",
                entry.time,
                entry.event,
                entry.actor(),
                entry.info()
            ),
            style,
        ));
    }
    if let Some(note) = &c.note {
        lines.push(Line::styled(format!("📝 {note}"), Style::default().fg(Color::Yellow)));
    }
    lines
}

fn severity_color(severity: &str) -> Color {
    match severity {
        "Critical" => Color::Red,
        "High" => Color::LightRed,
        "Low" => Color::Cyan,
        _ => Color::Yellow,
    }
}

fn alert(c: &Alert) -> Vec<Line<'_>> {
    let color = severity_color(&c.severity);
    let mut lines = vec![
        Line::styled(
            format!("🚨 {}", c.alert_title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::raw("Severity: "),
            Span::styled(c.severity.as_str(), Style::default().fg(color)),
        ]),
    ];
    if let Some(source) = &c.source {
        lines.push(Line::raw(format!("Source: {source}")));
    }
    lines.extend(text_block(&c.details));
    if !c.timeline.is_empty() {
        lines.push(Line::styled("Timeline:", bold()));
        lines.extend(c.timeline.iter().map(|t| Line::raw(format!("  • {t}"))));
    }
    lines
}

fn config(c: &ConfigView) -> Vec<Line<'_>> {
    let mut lines = vec![Line::styled(c.resource.as_str(), bold())];
    for s in &c.settings {
        let (mark, style) = match s.status {
            SettingStatus::Ok => ("●", Style::default().fg(Color::Green)),
            SettingStatus::Warning => ("●", Style::default().fg(Color::Yellow)),
            SettingStatus::Danger => ("●", Style::default().fg(Color::Red)),
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{:<24} {:<24} ", s.setting, s.value)),
            Span::styled(mark, style),
        ]));
    }
    if let Some(note) = &c.note {
        lines.push(Line::styled(format!("💡 {note}"), Style::default().fg(Color::Yellow)));
    }
    lines
}

fn code(c: &CodeView) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(c.endpoint.as_str(), bold()),
        Span::raw("  "),
        Span::styled(c.auth.as_str(), Style::default().fg(Color::Cyan)),
    ])];
    lines.extend(
        c.code
            .trim_matches('\n')
            .lines()
            .map(|l| Line::styled(l, Style::default().fg(Color::Gray))),
    );
    lines
}

fn generic(c: &Generic) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    if let Some(context) = &c.context {
        lines.extend(text_block(context));
    }
    if let Some(quote) = &c.quote {
        lines.push(Line::raw(""));
        lines.extend(
            text_block(quote).map(|l| {
                l.style(Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC))
            }),
        );
    }
    if let Some(details) = &c.details {
        lines.push(Line::raw(""));
        lines.extend(text_block(details).map(|l| l.style(dim())));
    }
    if let Some(options) = &c.options {
        lines.push(Line::raw(""));
        lines.push(Line::styled(options.as_str(), bold()));
    }
    lines
}
