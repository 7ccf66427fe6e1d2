mod route;
mod scheduler;
mod state;

use std::{sync::Arc, time::Duration};

use advisor::{
    ChatMessage, ChatTransport, GeminiTransport, create_financial_chat, send_message_to_advisor,
};
use crossterm::event::{self, Event};
use engine::{
    Credentials, EngineError, FileStore, Ledger, LinkStep, LinkTimer, Passcode, ScanStatus,
    Scheduler, SessionGate, SignInStep, SignInTimer, SimulatedVerifier, TransferWizard,
    WizardState, WizardTimer, current_user,
};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use route::{MAINTENANCE_NOTICE, Route, Service};
pub use scheduler::{AppEvent, ToastTimer, TokioScheduler};
pub use state::{
    AccountState, AdvisorState, AppState, DashboardFocus, DashboardState, LinkField, LinkScreen,
    LoginField, LoginState, RECENT_LIMIT, SecurityState, SecurityStep, ToastLevel, ToastState,
    TransactionsState, TransferField, TransferScreen, select_next, select_prev,
};

const TOAST_TTL: Duration = Duration::from_secs(3);

pub struct App {
    pub state: AppState,
    scheduler: TokioScheduler,
    events: UnboundedReceiver<AppEvent>,
    transport: Arc<dyn ChatTransport>,
    verifier: SimulatedVerifier,
    next_toast: u64,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let timezone = config.tz()?;
        let store = FileStore::open(&config.state_path)?;
        let gate = SessionGate::new(Box::new(store))
            .with_policy(config.login.mode.into())
            .with_second_factor(config.login.second_factor);
        let transport: Arc<dyn ChatTransport> = Arc::new(GeminiTransport::new(config.advisor)?);
        let (scheduler, events) = TokioScheduler::new(timezone);
        Ok(Self::with_parts(gate, transport, scheduler, events))
    }

    fn with_parts(
        gate: SessionGate,
        transport: Arc<dyn ChatTransport>,
        scheduler: TokioScheduler,
        events: UnboundedReceiver<AppEvent>,
    ) -> Self {
        let ledger = Ledger::seeded();
        let transfer = TransferScreen::new(new_wizard(&ledger, &gate));
        let route = Route::Dashboard.resolve(gate.is_authenticated());
        tracing::info!(route = %route.path(), "client started");

        let state = AppState {
            route,
            history: Vec::new(),
            user: current_user(),
            ledger,
            gate,
            login: LoginState::default(),
            dashboard: DashboardState::default(),
            transactions: TransactionsState::default(),
            account: AccountState::default(),
            transfer,
            link: LinkScreen::default(),
            advisor: AdvisorState::default(),
            security: SecurityState::default(),
            toast: None,
        };

        Self {
            state,
            scheduler,
            events,
            transport,
            verifier: SimulatedVerifier,
            next_toast: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            while let Ok(event) = self.events.try_recv() {
                self.handle_event(event);
            }

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_action(map_key(key)),
                    Event::Paste(text) => self.handle_paste(&text),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Wizard(timer) => self.on_wizard_timer(timer),
            AppEvent::SignIn(timer) => self.on_sign_in_timer(timer),
            AppEvent::Link(timer) => self.on_link_timer(timer),
            AppEvent::ToastExpired(id) => {
                if self.state.toast.as_ref().is_some_and(|toast| toast.id == id) {
                    self.state.toast = None;
                }
            }
            AppEvent::AdvisorReply { session, reply } => {
                let advisor = &mut self.state.advisor;
                if advisor.pending {
                    advisor.pending = false;
                    advisor.session = Some(session);
                    advisor.log.push(ChatMessage::model(reply));
                }
            }
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.route.clone() {
            Route::Login => self.on_login_key(action),
            Route::Dashboard => self.on_dashboard_key(action),
            Route::Transactions => self.on_transactions_key(action),
            Route::Transfer => self.on_transfer_key(action),
            Route::Account(id) => self.on_account_key(&id, action),
            Route::Receipt(id) => self.on_receipt_key(&id, action),
            Route::LinkAccount => self.on_link_key(action),
            Route::Advisor => self.on_advisor_key(action),
            Route::Security => self.on_security_key(action),
            Route::Service(_) => {
                if matches!(action, AppAction::Back | AppAction::Submit) {
                    self.back();
                }
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        let typed: String = text.chars().filter(|ch| !ch.is_control()).collect();
        match self.state.route {
            Route::Login => match self.state.login.second_factor.as_mut() {
                Some(code) => {
                    code.paste(text);
                }
                None => self.state.login.active_field_mut().push_str(&typed),
            },
            Route::Transfer => {
                let screen = &mut self.state.transfer;
                if screen.wizard.passcode().is_some() {
                    screen.wizard.paste_passcode(text);
                } else {
                    typed.chars().for_each(|ch| screen.type_char(ch));
                }
            }
            Route::Transactions if self.state.transactions.searching => {
                self.state.transactions.query.search.push_str(&typed);
                self.state.transactions.selected = 0;
            }
            Route::LinkAccount => {
                let link = &mut self.state.link;
                match (link.wizard.step(), link.focus) {
                    (LinkStep::Select, _) => {
                        let search = format!("{}{typed}", link.wizard.search());
                        link.wizard.set_search(search);
                        link.selected = 0;
                    }
                    (LinkStep::Credentials, LinkField::Username) => {
                        link.wizard.username.push_str(&typed)
                    }
                    (LinkStep::Credentials, LinkField::Password) => {
                        link.wizard.password.push_str(&typed)
                    }
                    _ => {}
                }
            }
            Route::Advisor => self.state.advisor.input.push_str(&typed),
            Route::Security => {
                if let SecurityStep::Verify(code) = &mut self.state.security.step {
                    code.paste(text);
                }
            }
            _ => {}
        }
    }

    // Navigation

    pub fn navigate(&mut self, route: Route) {
        self.go(route, true);
    }

    fn back(&mut self) {
        let target = self.state.history.pop().unwrap_or(Route::Dashboard);
        self.go(target, false);
    }

    fn go(&mut self, route: Route, remember: bool) {
        let target = route.resolve(self.state.gate.is_authenticated());
        if target == self.state.route {
            return;
        }
        if self.leave_blocked() {
            self.toast(
                ToastLevel::Info,
                "Please wait until the current step finishes.",
            );
            return;
        }

        let previous = std::mem::replace(&mut self.state.route, target.clone());
        if Route::NAV.contains(&target) {
            self.state.history.clear();
            if target != Route::Dashboard {
                self.state.history.push(Route::Dashboard);
            }
        } else if remember && previous.requires_auth() {
            self.state.history.push(previous.clone());
        }
        tracing::debug!(from = %previous.path(), to = %target.path(), "navigate");
        self.enter(&target);
    }

    /// Screens that still wait on a timer cannot be left.
    fn leave_blocked(&self) -> bool {
        match self.state.route {
            Route::Transfer => !self.state.transfer.can_leave(),
            Route::LinkAccount => self.state.link.wizard.step() == LinkStep::Verifying,
            _ => false,
        }
    }

    /// Fresh screen state, as if the page had just been opened.
    fn enter(&mut self, route: &Route) {
        match route {
            Route::Transactions => self.state.transactions = TransactionsState::default(),
            Route::Transfer => {
                self.state.transfer =
                    TransferScreen::new(new_wizard(&self.state.ledger, &self.state.gate));
            }
            Route::Account(_) => self.state.account = AccountState::default(),
            Route::LinkAccount => self.state.link = LinkScreen::default(),
            Route::Advisor if !self.state.advisor.pending => {
                let session =
                    create_financial_chat(self.state.ledger.transactions(), self.transport.clone());
                self.state.advisor = AdvisorState {
                    session: Some(session),
                    ..Default::default()
                };
            }
            Route::Security => self.state.security = SecurityState::default(),
            _ => {}
        }
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.next_toast += 1;
        let id = self.next_toast;
        self.state.toast = Some(ToastState {
            id,
            message: message.into(),
            level,
        });
        self.scheduler.schedule(TOAST_TTL, ToastTimer { id });
    }

    // Sign-in

    fn on_login_key(&mut self, action: AppAction) {
        if self.state.login.biometric.is_active() {
            return;
        }

        if let Some(code) = self.state.login.second_factor.as_mut() {
            match action {
                AppAction::Input(ch) => {
                    code.push(ch);
                }
                AppAction::Backspace => code.pop(),
                AppAction::Submit => self.complete_second_factor(),
                AppAction::Back => {
                    self.state.gate.cancel_second_factor();
                    self.state.login.second_factor = None;
                    self.state.login.message = None;
                }
                _ => {}
            }
            return;
        }

        let login = &mut self.state.login;
        match action {
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                login.toggle_focus();
            }
            AppAction::Input(ch) => login.active_field_mut().push(ch),
            AppAction::Backspace => {
                login.active_field_mut().pop();
            }
            AppAction::Submit => self.submit_login(),
            AppAction::Ctrl('b') => {
                login.message = None;
                login.biometric.start(&mut self.scheduler);
            }
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let login = &mut self.state.login;
        let credentials = Credentials::new(login.username.trim(), login.password.as_str());
        if credentials.username.is_empty() || credentials.password.is_empty() {
            login.message = Some("Enter your Client ID and password.".to_string());
            return;
        }

        match self.state.gate.sign_in(&credentials) {
            Ok(SignInStep::Authenticated) => self.after_sign_in(),
            Ok(SignInStep::SecondFactorRequired) => {
                self.state.login.second_factor = Some(Passcode::new());
                self.state.login.message = None;
            }
            Err(EngineError::InvalidCredentials) => {
                self.state.login.message = Some("Invalid Client ID or password.".to_string());
            }
            Err(err) => {
                tracing::error!(error = %err, "sign-in failed");
                self.state.login.message = Some(err.to_string());
            }
        }
    }

    fn complete_second_factor(&mut self) {
        let Some(code) = self.state.login.second_factor.clone() else {
            return;
        };
        match self.state.gate.complete_second_factor(&code, &self.verifier) {
            Ok(()) => self.after_sign_in(),
            Err(EngineError::IncompletePasscode) => {
                self.state.login.message =
                    Some(engine::PasscodeError::Incomplete.to_string());
            }
            Err(EngineError::InvalidCredentials) => {
                self.state.login.message = Some(engine::PasscodeError::Rejected.to_string());
            }
            Err(err) => {
                tracing::error!(error = %err, "second factor failed");
                self.state.login.message = Some(err.to_string());
            }
        }
    }

    fn on_sign_in_timer(&mut self, timer: SignInTimer) {
        let result = self.state.login.biometric.on_timer(
            timer,
            &self.verifier,
            &mut self.state.gate,
            &mut self.scheduler,
        );
        match result {
            Ok(true) => self.after_sign_in(),
            Ok(false) => {}
            Err(err) => {
                tracing::error!(error = %err, "biometric sign-in failed");
                self.state.login.message = Some(err.to_string());
            }
        }
    }

    fn after_sign_in(&mut self) {
        self.state.login = LoginState::default();
        self.state.history.clear();
        self.state.route = Route::Dashboard;
        self.state.dashboard = DashboardState::default();
        let greeting = format!("Welcome back, {}", self.state.user.first_name());
        self.toast(ToastLevel::Success, greeting);
    }

    fn sign_out(&mut self) {
        if let Err(err) = self.state.gate.sign_out() {
            tracing::error!(error = %err, "sign-out failed");
            self.toast(ToastLevel::Error, err.to_string());
            return;
        }
        self.state.history.clear();
        self.state.route = Route::Login;
        self.state.advisor = AdvisorState::default();
        self.toast(ToastLevel::Info, "Signed out");
    }

    // Dashboard

    fn on_dashboard_key(&mut self, action: AppAction) {
        let accounts = self.state.ledger.accounts().len();
        let recent = self.state.ledger.transactions().len().min(RECENT_LIMIT);
        let dashboard = &mut self.state.dashboard;

        match action {
            AppAction::NextField | AppAction::PrevField => {
                dashboard.focus = match dashboard.focus {
                    DashboardFocus::Accounts => DashboardFocus::Recent,
                    DashboardFocus::Recent => DashboardFocus::Accounts,
                };
            }
            AppAction::Left if dashboard.focus == DashboardFocus::Accounts => {
                select_prev(&mut dashboard.account);
            }
            AppAction::Right if dashboard.focus == DashboardFocus::Accounts => {
                select_next(&mut dashboard.account, accounts);
            }
            AppAction::Up if dashboard.focus == DashboardFocus::Recent => {
                select_prev(&mut dashboard.recent);
            }
            AppAction::Down if dashboard.focus == DashboardFocus::Recent => {
                select_next(&mut dashboard.recent, recent);
            }
            AppAction::Submit => {
                let route = match dashboard.focus {
                    DashboardFocus::Accounts => self
                        .state
                        .ledger
                        .accounts()
                        .get(dashboard.account)
                        .map(|a| Route::Account(a.id.clone())),
                    DashboardFocus::Recent => self
                        .state
                        .ledger
                        .transactions()
                        .get(dashboard.recent)
                        .map(|t| Route::Receipt(t.id.clone())),
                };
                if let Some(route) = route {
                    self.navigate(route);
                }
            }
            AppAction::Input('1') => self.navigate(Route::Transfer),
            AppAction::Input(ch @ '2'..='6') => {
                let index = ch as usize - '2' as usize;
                if let Some(service) = Service::ALL.get(index) {
                    self.navigate(Route::Service(*service));
                }
            }
            AppAction::Input('r' | 'v') => self.navigate(Route::Transactions),
            AppAction::Input('a' | 'i') => self.navigate(Route::Advisor),
            AppAction::Input('l') => self.navigate(Route::LinkAccount),
            AppAction::Input('s') => self.navigate(Route::Security),
            AppAction::Input('o') => self.sign_out(),
            AppAction::Input('q') => self.should_quit = true,
            _ => {}
        }
    }

    // Reports

    fn on_transactions_key(&mut self, action: AppAction) {
        let len = self.state.ledger.query(&self.state.transactions.query).len();
        let transactions = &mut self.state.transactions;

        if transactions.searching {
            match action {
                AppAction::Input(ch) => {
                    transactions.query.search.push(ch);
                    transactions.selected = 0;
                }
                AppAction::Backspace => {
                    transactions.query.search.pop();
                    transactions.selected = 0;
                }
                AppAction::Submit | AppAction::Back => transactions.searching = false,
                AppAction::Up => select_prev(&mut transactions.selected),
                AppAction::Down => select_next(&mut transactions.selected, len),
                _ => {}
            }
            return;
        }

        match action {
            AppAction::Input('/') => transactions.searching = true,
            AppAction::Input('f') => {
                transactions.query.direction = transactions.query.direction.next();
                transactions.selected = 0;
            }
            AppAction::Input('s') => {
                transactions.query.order =
                    Some(engine::AmountOrder::toggle(transactions.query.order));
                transactions.selected = 0;
            }
            AppAction::Input('c') => *transactions = TransactionsState::default(),
            AppAction::Up => select_prev(&mut transactions.selected),
            AppAction::Down => select_next(&mut transactions.selected, len),
            AppAction::Submit => {
                let id = self
                    .state
                    .ledger
                    .query(&self.state.transactions.query)
                    .get(self.state.transactions.selected)
                    .map(|tx| tx.id.clone());
                if let Some(id) = id {
                    self.navigate(Route::Receipt(id));
                }
            }
            AppAction::Back => self.back(),
            _ => {}
        }
    }

    fn on_account_key(&mut self, account_id: &str, action: AppAction) {
        if self.state.ledger.account(account_id).is_none() {
            if matches!(action, AppAction::Back | AppAction::Submit) {
                self.navigate(Route::Dashboard);
            }
            return;
        }

        let len = self.state.ledger.account_transactions(account_id).len();
        match action {
            AppAction::Up => select_prev(&mut self.state.account.selected),
            AppAction::Down => select_next(&mut self.state.account.selected, len),
            AppAction::Submit => {
                let id = self
                    .state
                    .ledger
                    .account_transactions(account_id)
                    .get(self.state.account.selected)
                    .map(|tx| tx.id.clone());
                if let Some(id) = id {
                    self.navigate(Route::Receipt(id));
                }
            }
            AppAction::Input('e') => self.export_statement(account_id),
            AppAction::Input('t') => self.navigate(Route::Transfer),
            AppAction::Back => self.back(),
            _ => {}
        }
    }

    fn export_statement(&mut self, account_id: &str) {
        let path = format!("statement_{account_id}.csv");
        let result = self
            .state
            .ledger
            .export_statement(account_id)
            .map_err(AppError::from)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(AppError::from));
        match result {
            Ok(()) => {
                tracing::info!(account = account_id, %path, "statement exported");
                self.toast(ToastLevel::Success, format!("Statement saved to {path}"));
            }
            Err(err) => {
                tracing::error!(error = %err, account = account_id, "statement export failed");
                self.toast(ToastLevel::Error, format!("Export failed: {err}"));
            }
        }
    }

    fn on_receipt_key(&mut self, transaction_id: &str, action: AppAction) {
        let found = self.state.ledger.transaction(transaction_id).is_some();
        match action {
            AppAction::Back => self.back(),
            AppAction::Submit if !found => self.navigate(Route::Dashboard),
            _ => {}
        }
    }

    // Transfer wizard

    fn on_transfer_key(&mut self, action: AppAction) {
        match self.state.transfer.wizard.state() {
            WizardState::FormEntry { submitting: false } => self.on_transfer_form_key(action),
            WizardState::BiometricCheck {
                scan: ScanStatus::Rejected,
            } => match action {
                AppAction::Submit | AppAction::Input('r') => {
                    self.state.transfer.wizard.retry_biometric(&mut self.scheduler);
                }
                AppAction::Back => self.back(),
                _ => {}
            },
            WizardState::PasscodeChallenge { .. } => match action {
                AppAction::Input(ch) => {
                    self.state.transfer.wizard.type_digit(ch);
                }
                AppAction::Backspace => {
                    self.state.transfer.wizard.erase_digit();
                }
                AppAction::Submit => self.confirm_passcode(),
                AppAction::Back => self.back(),
                _ => {}
            },
            WizardState::Processing {
                failure: Some(_), ..
            } => match action {
                AppAction::Submit | AppAction::Input('r') => {
                    if let Err(err) = self.state.transfer.wizard.restart() {
                        tracing::error!(error = %err, "transfer restart failed");
                    }
                }
                AppAction::Back => self.back(),
                _ => {}
            },
            WizardState::Success(_) => {
                if matches!(action, AppAction::Submit | AppAction::Back) {
                    self.navigate(Route::Dashboard);
                }
            }
            _ => {}
        }
    }

    fn on_transfer_form_key(&mut self, action: AppAction) {
        let screen = &mut self.state.transfer;
        let on_text = screen.field().is_text();
        match action {
            AppAction::NextField | AppAction::Down => screen.next_field(),
            AppAction::PrevField | AppAction::Up => screen.prev_field(),
            AppAction::Left => screen.cycle(&self.state.ledger, false),
            AppAction::Right => screen.cycle(&self.state.ledger, true),
            AppAction::Input(' ') if !on_text => screen.cycle(&self.state.ledger, true),
            AppAction::Input('l') if !on_text => self.navigate(Route::LinkAccount),
            AppAction::Input(ch) => screen.type_char(ch),
            AppAction::Backspace => screen.erase_char(),
            AppAction::Submit => {
                let screen = &mut self.state.transfer;
                match screen.wizard.submit(&self.state.ledger, &mut self.scheduler) {
                    Ok(()) => screen.error = None,
                    Err(err) => screen.error = Some(err),
                }
            }
            AppAction::Back => self.back(),
            _ => {}
        }
    }

    fn confirm_passcode(&mut self) {
        match self.state.transfer.wizard.confirm_passcode(&mut self.scheduler) {
            Ok(outcome) if outcome.provisioning_requested => {
                let result = self.state.gate.provision_two_factor(
                    &outcome.secret,
                    &outcome.passcode,
                    &self.verifier,
                );
                match result {
                    Ok(()) => self.toast(ToastLevel::Success, "Two-factor authentication enabled"),
                    Err(err) => {
                        tracing::error!(error = %err, "two-factor provisioning failed");
                        self.toast(ToastLevel::Error, format!("Could not enable 2FA: {err}"));
                    }
                }
            }
            Ok(_) => {}
            Err(err) => tracing::debug!(error = %err, "passcode not accepted"),
        }
    }

    fn on_wizard_timer(&mut self, timer: WizardTimer) {
        let was_done = matches!(self.state.transfer.wizard.state(), WizardState::Success(_));
        let result = self.state.transfer.wizard.on_timer(
            timer,
            &mut self.state.ledger,
            &mut self.scheduler,
        );
        if let Err(err) = result {
            tracing::error!(error = %err, "transfer step failed");
            self.toast(ToastLevel::Error, err.to_string());
            return;
        }
        if !was_done && let WizardState::Success(receipt) = self.state.transfer.wizard.state() {
            let message = format!("Transfer Approved: {}", receipt.amount);
            self.toast(ToastLevel::Success, message);
        }
    }

    // Link account

    fn on_link_key(&mut self, action: AppAction) {
        let link = &mut self.state.link;
        match link.wizard.step() {
            LinkStep::Select => {
                let matches = link.wizard.matching_institutions();
                match action {
                    AppAction::Up => select_prev(&mut link.selected),
                    AppAction::Down => select_next(&mut link.selected, matches.len()),
                    AppAction::Input(ch) => {
                        let search = format!("{}{ch}", link.wizard.search());
                        link.wizard.set_search(search);
                        link.selected = 0;
                    }
                    AppAction::Backspace => {
                        let mut search = link.wizard.search().to_string();
                        search.pop();
                        link.wizard.set_search(search);
                        link.selected = 0;
                    }
                    AppAction::Submit => {
                        if let Some(name) = matches.get(link.selected)
                            && link.wizard.select(name).is_ok()
                        {
                            link.focus = LinkField::Username;
                        }
                    }
                    AppAction::Back => self.back(),
                    _ => {}
                }
            }
            LinkStep::Credentials => match action {
                AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                    link.focus = match link.focus {
                        LinkField::Username => LinkField::Password,
                        LinkField::Password => LinkField::Username,
                    };
                }
                AppAction::Input(ch) => match link.focus {
                    LinkField::Username => link.wizard.username.push(ch),
                    LinkField::Password => link.wizard.password.push(ch),
                },
                AppAction::Backspace => {
                    match link.focus {
                        LinkField::Username => link.wizard.username.pop(),
                        LinkField::Password => link.wizard.password.pop(),
                    };
                }
                AppAction::Submit => {
                    if link.wizard.submit(&mut self.scheduler).is_err() {
                        self.toast(ToastLevel::Error, "Enter your User ID and password.");
                    }
                }
                AppAction::Back => link.wizard.back(),
                _ => {}
            },
            LinkStep::Verifying => {}
            LinkStep::Success => match action {
                AppAction::Submit => self.navigate(Route::Transfer),
                AppAction::Back => self.back(),
                _ => {}
            },
        }
    }

    fn on_link_timer(&mut self, timer: LinkTimer) {
        self.state.link.wizard.on_timer(timer);
        if self.state.link.wizard.step() == LinkStep::Success
            && let Some(institution) = self.state.link.wizard.institution()
        {
            tracing::info!(institution, "external account linked");
        }
    }

    // Advisor

    fn on_advisor_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input(ch) => self.state.advisor.input.push(ch),
            AppAction::Backspace => {
                self.state.advisor.input.pop();
            }
            AppAction::Submit => self.send_to_advisor(),
            AppAction::Back => self.back(),
            _ => {}
        }
    }

    fn send_to_advisor(&mut self) {
        let advisor = &mut self.state.advisor;
        if !advisor.can_send() {
            return;
        }
        let Some(mut session) = advisor.session.take() else {
            return;
        };
        let text = std::mem::take(&mut advisor.input).trim().to_string();
        advisor.log.push(ChatMessage::user(text.clone()));
        advisor.pending = true;

        let tx = self.scheduler.sender();
        tokio::spawn(async move {
            let reply = send_message_to_advisor(&mut session, &text).await;
            if tx.send(AppEvent::AdvisorReply { session, reply }).is_err() {
                tracing::debug!("event loop gone, advisor reply dropped");
            }
        });
    }

    // Security

    fn on_security_key(&mut self, action: AppAction) {
        let enabled = self.state.gate.two_factor_enabled();
        let security = &mut self.state.security;
        match (&mut security.step, action) {
            (SecurityStep::Idle, AppAction::Submit) if !enabled => {
                security.message = None;
                security.step = SecurityStep::ShowSecret;
            }
            (SecurityStep::Idle, AppAction::Input('d')) if enabled => {
                match self.state.gate.disable_two_factor() {
                    Ok(()) => self.toast(ToastLevel::Info, "Two-factor authentication disabled"),
                    Err(err) => self.toast(ToastLevel::Error, err.to_string()),
                }
            }
            (SecurityStep::Idle, AppAction::Back) => self.back(),
            (SecurityStep::ShowSecret, AppAction::Submit) => {
                security.step = SecurityStep::Verify(Passcode::new());
            }
            (SecurityStep::ShowSecret, AppAction::Back) => security.step = SecurityStep::Idle,
            (SecurityStep::Verify(code), AppAction::Input(ch)) => {
                code.push(ch);
                security.message = None;
            }
            (SecurityStep::Verify(code), AppAction::Backspace) => code.pop(),
            (SecurityStep::Verify(_), AppAction::Back) => security.step = SecurityStep::ShowSecret,
            (SecurityStep::Verify(code), AppAction::Submit) => {
                let code = code.clone();
                let result =
                    self.state
                        .gate
                        .provision_two_factor(&security.secret, &code, &self.verifier);
                match result {
                    Ok(()) => {
                        security.step = SecurityStep::Idle;
                        self.toast(ToastLevel::Success, "Two-factor authentication enabled");
                    }
                    Err(EngineError::IncompletePasscode) => {
                        security.message = Some(engine::PasscodeError::Incomplete.to_string());
                    }
                    Err(EngineError::InvalidCredentials) => {
                        security.message = Some(engine::PasscodeError::Rejected.to_string());
                    }
                    Err(err) => security.message = Some(err.to_string()),
                }
            }
            _ => {}
        }
    }
}

fn new_wizard(ledger: &Ledger, gate: &SessionGate) -> TransferWizard {
    TransferWizard::new(
        ledger,
        Box::new(SimulatedVerifier),
        gate.two_factor_enabled(),
    )
}
