use advisor::{AdvisorSession, ChatLog};
use engine::{
    BiometricSignIn, FormError, Ledger, LinkAccountWizard, Passcode, ProvisioningSecret,
    ScanStatus, SessionGate, TransactionQuery, TransferKind, TransferWizard, UserProfile,
    WizardState,
};

use super::route::Route;

/// Rows of the recent-activity panel on the dashboard.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
    pub biometric: BiometricSignIn,
    /// Authenticator code, while the gate waits for it.
    pub second_factor: Option<Passcode>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: LoginField::Username,
            message: None,
            biometric: BiometricSignIn::default(),
            second_factor: None,
        }
    }
}

impl LoginState {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardFocus {
    #[default]
    Accounts,
    Recent,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub focus: DashboardFocus,
    pub account: usize,
    pub recent: usize,
}

#[derive(Debug, Default)]
pub struct TransactionsState {
    pub query: TransactionQuery,
    /// Typed keys go to the search box.
    pub searching: bool,
    pub selected: usize,
}

#[derive(Debug, Default)]
pub struct AccountState {
    pub selected: usize,
}

/// Moves a list cursor down, staying on the last row.
pub fn select_next(selected: &mut usize, len: usize) {
    if len == 0 {
        *selected = 0;
        return;
    }
    *selected = (*selected + 1).min(len - 1);
}

pub fn select_prev(selected: &mut usize) {
    *selected = selected.saturating_sub(1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferField {
    Kind,
    From,
    Destination,
    Speed,
    Beneficiary,
    Swift,
    Iban,
    Recipient,
    Amount,
}

impl TransferField {
    pub fn for_kind(kind: TransferKind) -> &'static [TransferField] {
        use TransferField::*;
        match kind {
            TransferKind::Ach => &[Kind, From, Destination, Speed, Amount],
            TransferKind::Wire => &[Kind, From, Beneficiary, Swift, Iban, Amount],
            TransferKind::Rtp => &[Kind, From, Recipient, Amount],
            TransferKind::Internal => &[Kind, From, Destination, Amount],
        }
    }

    pub fn label(self, kind: TransferKind) -> &'static str {
        match self {
            Self::Kind => "Transfer Type",
            Self::From => "From Source Account",
            Self::Destination if kind == TransferKind::Ach => "Recipient Account (Linked)",
            Self::Destination => "Destination Account",
            Self::Speed => "Delivery Speed",
            Self::Beneficiary => "Beneficiary Name",
            Self::Swift => "SWIFT / BIC Code",
            Self::Iban => "IBAN / Account Number",
            Self::Recipient => "Recipient Email or Mobile",
            Self::Amount => "Amount",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Beneficiary => "FULL LEGAL NAME",
            Self::Swift => "ABCDUS33XXX",
            Self::Recipient => "name@example.com or 555-0123",
            Self::Amount => "0.00",
            _ => "",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::Beneficiary | Self::Swift | Self::Iban | Self::Recipient | Self::Amount
        )
    }
}

#[derive(Debug)]
pub struct TransferScreen {
    pub wizard: TransferWizard,
    pub focus: usize,
    pub error: Option<FormError>,
}

impl TransferScreen {
    pub fn new(wizard: TransferWizard) -> Self {
        Self {
            wizard,
            focus: 0,
            error: None,
        }
    }

    pub fn fields(&self) -> &'static [TransferField] {
        TransferField::for_kind(self.wizard.form().kind)
    }

    pub fn field(&self) -> TransferField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Whether the wizard can be dropped without timers still in flight.
    pub fn can_leave(&self) -> bool {
        match self.wizard.state() {
            WizardState::FormEntry { submitting } => !submitting,
            WizardState::BiometricCheck { scan } => *scan == ScanStatus::Rejected,
            WizardState::PasscodeChallenge { .. } | WizardState::Success(_) => true,
            WizardState::Processing { failure, .. } => failure.is_some(),
        }
    }

    /// Steps a choice field (type, accounts, speed) forward or back.
    pub fn cycle(&mut self, ledger: &Ledger, forward: bool) {
        let field = self.field();
        if field == TransferField::Kind {
            let kind = self.wizard.form().kind;
            let next = if forward { kind.next() } else { kind.previous() };
            if self.wizard.select_kind(next).is_ok() {
                self.error = None;
            }
            return;
        }

        let Some(form) = self.wizard.form_mut() else {
            return;
        };
        match field {
            TransferField::From => {
                let ids: Vec<&str> = ledger.accounts().iter().map(|a| a.id.as_str()).collect();
                let next = step(&ids, Some(form.from_account_id.as_str()), forward)
                    .map(str::to_string);
                if let Some(next) = next {
                    form.from_account_id = next;
                    form.to_account_id = None;
                }
            }
            TransferField::Destination if form.kind == TransferKind::Ach => {
                let mut ids: Vec<Option<&str>> = vec![None];
                ids.extend(ledger.linked_accounts().iter().map(|a| Some(a.id.as_str())));
                let current = form.linked_account_id.as_deref();
                let next = step(&ids, Some(current), forward).map(|id| id.map(str::to_string));
                if let Some(next) = next {
                    form.linked_account_id = next;
                }
            }
            TransferField::Destination => {
                let ids: Vec<&str> = form
                    .internal_destinations(ledger)
                    .iter()
                    .map(|a| a.id.as_str())
                    .collect();
                let current = form
                    .internal_destination(ledger)
                    .map(|a| a.id.as_str());
                if let Some(next) = step(&ids, current, forward) {
                    form.to_account_id = Some(next.to_string());
                }
            }
            TransferField::Speed => form.ach_speed = form.ach_speed.toggle(),
            _ => return,
        }
        self.error = None;
    }

    pub fn type_char(&mut self, ch: char) {
        let field = self.field();
        let Some(form) = self.wizard.form_mut() else {
            return;
        };
        let target = match field {
            TransferField::Amount if ch.is_ascii_digit() || ch == '.' || ch == ',' => {
                &mut form.amount
            }
            TransferField::Beneficiary => &mut form.beneficiary,
            TransferField::Swift => &mut form.swift,
            TransferField::Iban => &mut form.iban,
            TransferField::Recipient => &mut form.recipient,
            _ => return,
        };
        target.push(ch);
        self.error = None;
    }

    pub fn erase_char(&mut self) {
        let field = self.field();
        let Some(form) = self.wizard.form_mut() else {
            return;
        };
        let target = match field {
            TransferField::Amount => &mut form.amount,
            TransferField::Beneficiary => &mut form.beneficiary,
            TransferField::Swift => &mut form.swift,
            TransferField::Iban => &mut form.iban,
            TransferField::Recipient => &mut form.recipient,
            _ => return,
        };
        target.pop();
        self.error = None;
    }
}

fn step<T: Copy + PartialEq>(items: &[T], current: Option<T>, forward: bool) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let index = current.and_then(|c| items.iter().position(|item| *item == c));
    let next = match (index, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % items.len(),
        (Some(i), false) => (i + items.len() - 1) % items.len(),
    };
    items.get(next).copied()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LinkScreen {
    pub wizard: LinkAccountWizard,
    pub selected: usize,
    pub focus: LinkField,
}

#[derive(Debug, Default)]
pub struct AdvisorState {
    pub log: ChatLog,
    pub input: String,
    /// `None` before the first visit and while a request holds it.
    pub session: Option<AdvisorSession>,
    pub pending: bool,
}

impl AdvisorState {
    pub fn can_send(&self) -> bool {
        !self.pending && self.session.is_some() && !self.input.trim().is_empty()
    }
}

/// Authenticator setup from the security page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SecurityStep {
    #[default]
    Idle,
    ShowSecret,
    Verify(Passcode),
}

#[derive(Debug, Default)]
pub struct SecurityState {
    pub secret: ProvisioningSecret,
    pub step: SecurityStep,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub route: Route,
    pub history: Vec<Route>,
    pub user: UserProfile,
    pub ledger: Ledger,
    pub gate: SessionGate,
    pub login: LoginState,
    pub dashboard: DashboardState,
    pub transactions: TransactionsState,
    pub account: AccountState,
    pub transfer: TransferScreen,
    pub link: LinkScreen,
    pub advisor: AdvisorState,
    pub security: SecurityState,
    pub toast: Option<ToastState>,
}

#[cfg(test)]
mod tests {
    use engine::{AchSpeed, ManualScheduler, SimulatedVerifier, WizardTimer};

    use super::*;

    fn screen(ledger: &Ledger) -> TransferScreen {
        TransferScreen::new(TransferWizard::new(
            ledger,
            Box::new(SimulatedVerifier),
            true,
        ))
    }

    #[test]
    fn fields_follow_the_selected_kind() {
        let ledger = Ledger::seeded();
        let mut screen = screen(&ledger);
        assert_eq!(screen.field(), TransferField::Kind);

        screen.cycle(&ledger, true);
        assert_eq!(screen.wizard.form().kind, TransferKind::Wire);
        assert_eq!(screen.fields().len(), 6);

        screen.prev_field();
        assert_eq!(screen.field(), TransferField::Amount);
        screen.type_char('1');
        screen.type_char('x');
        screen.type_char('5');
        assert_eq!(screen.wizard.form().amount, "15");
        screen.erase_char();
        assert_eq!(screen.wizard.form().amount, "1");
    }

    #[test]
    fn choice_fields_cycle_through_the_ledger() {
        let ledger = Ledger::seeded();
        let mut screen = screen(&ledger);
        screen.next_field();
        screen.cycle(&ledger, true);
        assert_eq!(screen.wizard.form().from_account_id, "acc_2");
        screen.cycle(&ledger, false);
        screen.cycle(&ledger, false);
        assert_eq!(screen.wizard.form().from_account_id, "acc_3");

        screen.next_field();
        screen.cycle(&ledger, true);
        let first_linked = ledger.linked_accounts()[0].id.clone();
        assert_eq!(
            screen.wizard.form().linked_account_id.as_deref(),
            Some(first_linked.as_str())
        );

        screen.next_field();
        screen.cycle(&ledger, true);
        assert_eq!(screen.wizard.form().ach_speed, AchSpeed::NextDay);
    }

    #[test]
    fn cannot_leave_while_timers_are_pending() {
        let ledger = Ledger::seeded();
        let mut screen = screen(&ledger);
        assert!(screen.can_leave());

        screen.wizard.form_mut().unwrap().amount = "10".to_string();
        let mut scheduler: ManualScheduler<WizardTimer> = ManualScheduler::default();
        screen.wizard.submit(&ledger, &mut scheduler).unwrap();
        assert!(!screen.can_leave());
    }

    #[test]
    fn list_cursor_is_bounded() {
        let mut selected = 0;
        select_next(&mut selected, 2);
        select_next(&mut selected, 2);
        assert_eq!(selected, 1);
        select_prev(&mut selected);
        select_prev(&mut selected);
        assert_eq!(selected, 0);
        select_next(&mut selected, 0);
        assert_eq!(selected, 0);
    }
}
