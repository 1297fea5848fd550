use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Manager,
    Executive,
    Helpdesk,
    Analyst,
    Engineer,
    Responder,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Employee,
        Role::Manager,
        Role::Executive,
        Role::Helpdesk,
        Role::Analyst,
        Role::Engineer,
        Role::Responder,
    ];

    /// Directory name under the content root.
    pub fn key(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Executive => "executive",
            Role::Helpdesk => "helpdesk",
            Role::Analyst => "analyst",
            Role::Engineer => "engineer",
            Role::Responder => "responder",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Executive => "Executive",
            Role::Helpdesk => "IT Help Desk",
            Role::Analyst => "Security Analyst",
            Role::Engineer => "Security Engineer",
            Role::Responder => "Incident Responder",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Role::Employee => "👤",
            Role::Manager => "👔",
            Role::Executive => "🎯",
            Role::Helpdesk => "🎧",
            Role::Analyst => "🔍",
            Role::Engineer => "⚙️",
            Role::Responder => "🚨",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Employee => "General staff member",
            Role::Manager => "Team lead / Supervisor",
            Role::Executive => "C-Suite / Director",
            Role::Helpdesk => "IT Support staff",
            Role::Analyst => "SOC / Threat analyst",
            Role::Engineer => "SecOps / Infrastructure",
            Role::Responder => "IR / Forensics team",
        }
    }
}

/// The eight scored topic tags. Anything else is rejected when content loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Phishing,
    SocialEngineering,
    Malware,
    PasswordSecurity,
    DataProtection,
    PhysicalSecurity,
    IncidentResponse,
    SecureConfiguration,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Phishing,
        Category::SocialEngineering,
        Category::Malware,
        Category::PasswordSecurity,
        Category::DataProtection,
        Category::PhysicalSecurity,
        Category::IncidentResponse,
        Category::SecureConfiguration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Phishing => "Phishing Detection",
            Category::SocialEngineering => "Social Engineering",
            Category::Malware => "Malware Recognition",
            Category::PasswordSecurity => "Password Security",
            Category::DataProtection => "Data Protection",
            Category::PhysicalSecurity => "Physical Security",
            Category::IncidentResponse => "Incident Response",
            Category::SecureConfiguration => "Secure Configuration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn tag(self) -> &'static str {
        match self {
            Difficulty::Easy => "🟢 EASY",
            Difficulty::Medium => "🟡 MEDIUM",
            Difficulty::Hard => "🔴 HARD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub setup: String,
    pub content: ScenarioContent,
    pub question: String,
    pub choices: Vec<Choice>,
    pub correct: String,
    pub explanation: String,
    pub lesson: String,
}

/// Payload of a boss attack. Same shape as a scenario minus the teaching text.
#[derive(Debug, Deserialize)]
pub struct AttackScenario {
    pub category: Category,
    pub content: ScenarioContent,
    pub question: String,
    pub choices: Vec<Choice>,
    pub correct: String,
}

#[derive(Debug, Deserialize)]
pub struct Attack {
    pub name: String,
    pub description: String,
    pub damage: u32,
    pub scenario: AttackScenario,
}

#[derive(Debug, Deserialize)]
pub struct Boss {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub health: u32,
    #[serde(default)]
    pub dialogue: Vec<String>,
    pub attacks: Vec<Attack>,
}

#[derive(Debug, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub name: String,
    pub description: String,
    pub scenarios: Vec<Scenario>,
    pub boss: Boss,
}

/// Anything the player can answer: an ordinary scenario or a boss attack.
pub trait Prompt {
    fn category(&self) -> Category;
    fn content(&self) -> &ScenarioContent;
    fn question(&self) -> &str;
    fn choices(&self) -> &[Choice];
    fn correct(&self) -> &str;

    fn choice_text(&self, id: &str) -> Option<&str> {
        self.choices()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.text.as_str())
    }

    fn has_choice(&self, id: &str) -> bool {
        self.choices().iter().any(|c| c.id == id)
    }

    fn is_correct(&self, id: &str) -> bool {
        id == self.correct()
    }
}

impl Prompt for Scenario {
    fn category(&self) -> Category {
        self.category
    }
    fn content(&self) -> &ScenarioContent {
        &self.content
    }
    fn question(&self) -> &str {
        &self.question
    }
    fn choices(&self) -> &[Choice] {
        &self.choices
    }
    fn correct(&self) -> &str {
        &self.correct
    }
}

impl Prompt for AttackScenario {
    fn category(&self) -> Category {
        self.category
    }
    fn content(&self) -> &ScenarioContent {
        &self.content
    }
    fn question(&self) -> &str {
        &self.question
    }
    fn choices(&self) -> &[Choice] {
        &self.choices
    }
    fn correct(&self) -> &str {
        &self.correct
    }
}

/// The simulated artifact shown above the question.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioContent {
    Email(Email),
    Chat(Chat),
    Sms(Sms),
    Browser(Browser),
    Phone(Phone),
    Ticket(Ticket),
    Logs(Logs),
    Alert(Alert),
    Config(ConfigView),
    Code(CodeView),
    Generic(Generic),
}

impl ScenarioContent {
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioContent::Email(_) => "email",
            ScenarioContent::Chat(_) => "chat",
            ScenarioContent::Sms(_) => "sms",
            ScenarioContent::Browser(_) => "browser",
            ScenarioContent::Phone(_) => "phone",
            ScenarioContent::Ticket(_) => "ticket",
            ScenarioContent::Logs(_) => "logs",
            ScenarioContent::Alert(_) => "alert",
            ScenarioContent::Config(_) => "config",
            ScenarioContent::Code(_) => "code",
            ScenarioContent::Generic(_) => "scenario",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Email {
    pub from: Sender,
    #[serde(default)]
    pub to: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub time: Option<String>,
    pub body: String,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub headers: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub external: bool,
}

#[derive(Debug, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub suspicious: bool,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub channel: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub user: String,
    #[serde(default)]
    pub user_type: UserType,
    pub time: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct Sms {
    pub number: String,
    pub messages: Vec<SmsMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsDirection {
    Received,
    Sent,
}

#[derive(Debug, Deserialize)]
pub struct SmsMessage {
    pub direction: SmsDirection,
    pub text: String,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Browser {
    pub url: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub suspicious_domain: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub login_form: Option<LoginForm>,
    #[serde(default)]
    pub popup: Option<Popup>,
}

impl Browser {
    pub fn shown_domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub logo: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupStyle {
    Info,
    Danger,
}

#[derive(Debug, Deserialize)]
pub struct Popup {
    pub style: PopupStyle,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub buttons: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Phone {
    pub caller: String,
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub title: String,
    pub priority: String,
    pub requester: Requester,
    pub details: String,
    #[serde(default)]
    pub manager: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Requester {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct Logs {
    pub entries: Vec<LogEntry>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub event: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub dest: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl LogEntry {
    pub fn actor(&self) -> &str {
        self.user
            .as_deref()
            .or(self.source.as_deref())
            .unwrap_or("-")
    }

    pub fn info(&self) -> &str {
        self.detail
            .as_deref()
            .or(self.dest.as_deref())
            .unwrap_or("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct Alert {
    pub alert_title: String,
    pub severity: String,
    #[serde(default)]
    pub source: Option<String>,
    pub details: String,
    #[serde(default)]
    pub timeline: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigView {
    pub resource: String,
    pub settings: Vec<ConfigSetting>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingStatus {
    Ok,
    Warning,
    Danger,
}

#[derive(Debug, Deserialize)]
pub struct ConfigSetting {
    pub setting: String,
    pub value: String,
    pub status: SettingStatus,
}

#[derive(Debug, Deserialize)]
pub struct CodeView {
    pub endpoint: String,
    pub auth: String,
    pub code: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Generic {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub options: Option<String>,
}
