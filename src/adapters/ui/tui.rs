//! Implements InputPort. Inquire-based operator console.
//!
//! Login screen first; then the admin menu: membership list (search, status
//! filter, details, status and notes changes, PIN-gated edit and delete),
//! new membership with a live quote, standalone quote calculator, CSV export
//! and statistics.

use super::progress::{show_lockout, with_spinner};
use crate::domain::catalog::all_areas;
use crate::domain::{
    Area, AreaCategory, AreaSelection, DomainError, GuardStatus, MembershipRecord,
    MembershipStatus, PlanTier,
};
use crate::ports::InputPort;
use crate::usecases::{
    ActionAuthorizer, ActionRequest, AttemptGuardService, AuthService, LockoutCountdown,
    LoginOutcome, MembershipFilter, MembershipForm, MembershipService, MembershipStats,
    PendingAction, PinOutcome, blocked_message,
};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use crossterm::style::Stylize;
use inquire::error::InquireError;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, MultiSelect, Password, PasswordDisplayMode, Select, Text};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y";
const PAGE_SIZE: usize = 15;

/// Colors for every inquire prompt rendered after this call.
pub fn apply_theme() {
    let mut config = RenderConfig::default();
    config.prompt_prefix = Styled::new("?").with_fg(Color::LightMagenta);
    config.answered_prompt_prefix = Styled::new("✔").with_fg(Color::LightGreen);
    config.highlighted_option_prefix = Styled::new("›").with_fg(Color::LightCyan);
    config.selected_checkbox = Styled::new("[x]").with_fg(Color::LightGreen);
    config.answer = StyleSheet::new()
        .with_attr(Attributes::BOLD)
        .with_fg(Color::LightCyan);
    config.help_message = StyleSheet::new().with_fg(Color::DarkGrey);
    inquire::set_global_render_config(config);
}

fn prompt_err(e: InquireError) -> DomainError {
    DomainError::Prompt(e.to_string())
}

fn success(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().green());
}

fn failure(msg: impl AsRef<str>) {
    eprintln!("{}", msg.as_ref().red());
}

fn notice(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().yellow());
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn required(
    message: &'static str,
) -> impl Fn(&str) -> Result<Validation, CustomUserError> + Clone {
    move |input: &str| {
        Ok(if input.trim().is_empty() {
            Validation::Invalid(message.into())
        } else {
            Validation::Valid
        })
    }
}

fn date_validator(input: &str) -> Result<Validation, CustomUserError> {
    Ok(
        match NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT) {
            Ok(_) => Validation::Valid,
            Err(_) => Validation::Invalid("Use the YYYY-MM-DD format".into()),
        },
    )
}

fn category_short(category: AreaCategory) -> &'static str {
    match category {
        AreaCategory::Large => "large",
        AreaCategory::Medium => "medium",
        AreaCategory::Small => "small",
    }
}

/// Area as a MultiSelect option.
#[derive(Clone)]
struct AreaOption(Area);

impl fmt::Display for AreaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.name, category_short(self.0.category))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    Memberships,
    NewMembership,
    Calculator,
    Export,
    Stats,
    SignOut,
    Exit,
}

impl MainAction {
    const ALL: [MainAction; 7] = [
        Self::Memberships,
        Self::NewMembership,
        Self::Calculator,
        Self::Export,
        Self::Stats,
        Self::SignOut,
        Self::Exit,
    ];
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memberships => "Memberships",
            Self::NewMembership => "New membership",
            Self::Calculator => "Quote calculator",
            Self::Export => "Export to CSV",
            Self::Stats => "Statistics",
            Self::SignOut => "Sign out",
            Self::Exit => "Exit",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordAction {
    ChangeStatus,
    EditNotes,
    Edit,
    Delete,
    Back,
}

impl RecordAction {
    const ALL: [RecordAction; 5] = [
        Self::ChangeStatus,
        Self::EditNotes,
        Self::Edit,
        Self::Delete,
        Self::Back,
    ];
}

impl fmt::Display for RecordAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ChangeStatus => "Change status",
            Self::EditNotes => "Edit notes",
            Self::Edit => "Edit membership (PIN)",
            Self::Delete => "Delete membership (PIN)",
            Self::Back => "Back",
        })
    }
}

enum Flow {
    SignOut,
    Exit,
}

fn summary_line(r: &MembershipRecord) -> String {
    format!(
        "{:<30} {:<11} {:<10} {:>7}  {}",
        r.client_name,
        r.client_phone,
        r.status.label(),
        format!("${}", r.monthly_payment),
        r.membership_type
    )
}

fn describe_filter(filter: &MembershipFilter) -> String {
    let mut parts = Vec::new();
    if !filter.search.trim().is_empty() {
        parts.push(format!("search \"{}\"", filter.search.trim()));
    }
    if let Some(status) = filter.status {
        parts.push(format!("status {}", status));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn print_details(r: &MembershipRecord) {
    println!();
    println!("  {}", r.client_name.as_str().bold());
    println!("  Phone           : {}", r.client_phone);
    println!(
        "  Email           : {}",
        r.client_email.as_deref().unwrap_or("-")
    );
    println!("  Type / plan     : {} / {}", r.membership_type, r.plan_name);
    println!("  Areas           : {}", r.area_names().join(", "));
    println!("  Monthly payment : ${}", r.monthly_payment);
    println!("  Initial payment : ${}", r.initial_payment);
    println!(
        "  Sessions        : {}/{} ({}%)",
        r.completed_sessions,
        r.total_sessions,
        r.progress_percent()
    );
    println!("  Status          : {}", r.status);
    println!(
        "  Start date      : {}",
        r.start_date.format(DATE_DISPLAY_FORMAT)
    );
    if let Some(end) = r.end_date {
        println!("  End date        : {}", end.format(DATE_DISPLAY_FORMAT));
    }
    println!(
        "  Created         : {}",
        r.created_at.format(DATE_DISPLAY_FORMAT)
    );
    if let Some(notes) = r.notes.as_deref() {
        println!("  Notes           : {}", notes);
    }
    println!();
}

fn print_quote(areas: &AreaSelection, plan: PlanTier) {
    let quote = areas.quote(plan);
    println!();
    println!("  Membership type : {}", quote.membership_type);
    println!(
        "  Plan            : {} ({} sessions)",
        plan, quote.total_sessions
    );
    if let Some(pct) = quote.discount_percent {
        println!("  Volume discount : {}%", pct);
    }
    if quote.savings > 0 {
        println!("  Regular price   : ${}", quote.individual_total);
        println!("  Savings         : ${}", quote.savings);
    }
    println!(
        "  Monthly payment : {}",
        format!("${}", quote.monthly_payment).bold()
    );
    println!("  Initial payment : ${}", quote.initial_payment);
    println!();
}

fn print_stats(stats: &MembershipStats) {
    println!();
    println!("  Total memberships : {}", stats.total);
    println!("  Active            : {}", stats.active);
    println!("  Completed         : {}", stats.completed);
    println!("  Monthly revenue   : ${}", stats.monthly_revenue);
    println!();
}

/// Multi-select over the catalog. Areas already on a record but missing from
/// the catalog are offered too, so editing never drops them silently.
fn select_areas(current: &[Area]) -> Result<Option<AreaSelection>, DomainError> {
    let mut options: Vec<AreaOption> = all_areas().into_iter().map(AreaOption).collect();
    for area in current {
        if !options.iter().any(|o| o.0.name == area.name) {
            options.push(AreaOption(area.clone()));
        }
    }
    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, o)| current.iter().any(|c| c.name == o.0.name))
        .map(|(i, _)| i)
        .collect();

    let picked = MultiSelect::new("Treatment areas:", options)
        .with_default(&defaults)
        .with_page_size(12)
        .with_help_message("space to toggle, type to search, enter to confirm")
        .prompt_skippable()
        .map_err(prompt_err)?;
    Ok(picked.map(|p| AreaSelection::from_areas(p.into_iter().map(|o| o.0))))
}

fn select_plan(current: PlanTier) -> Result<Option<PlanTier>, DomainError> {
    let cursor = PlanTier::ALL
        .iter()
        .position(|t| *t == current)
        .unwrap_or(1);
    Select::new("Plan:", PlanTier::ALL.to_vec())
        .with_starting_cursor(cursor)
        .prompt_skippable()
        .map_err(prompt_err)
}

/// Prompt every form field, show the quote and ask for confirmation.
/// `None` when the operator backs out.
fn fill_form(mut form: MembershipForm, title: &str) -> Result<Option<MembershipForm>, DomainError> {
    println!("{}", title.bold());
    loop {
        let Some(name) = Text::new("Client full name:")
            .with_initial_value(&form.client_name)
            .with_help_message("first name and both last names")
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(None);
        };
        form.client_name = name;

        let Some(phone) = Text::new("Phone (10 digits):")
            .with_initial_value(&form.client_phone)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(None);
        };
        form.set_phone(&phone);

        let Some(email) = Text::new("Email:")
            .with_initial_value(&form.client_email)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(None);
        };
        form.client_email = email;

        let Some(plan) = select_plan(form.plan)? else {
            return Ok(None);
        };
        form.plan = plan;

        let Some(areas) = select_areas(form.areas.areas())? else {
            return Ok(None);
        };
        form.areas = areas;

        let initial_date = form.start_date.format(DATE_INPUT_FORMAT).to_string();
        let Some(date) = Text::new("Start date (YYYY-MM-DD):")
            .with_initial_value(&initial_date)
            .with_validator(date_validator)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(None);
        };
        form.start_date =
            NaiveDate::parse_from_str(date.trim(), DATE_INPUT_FORMAT).unwrap_or(form.start_date);

        let Some(notes) = Text::new("Notes (optional):")
            .with_initial_value(&form.notes)
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(None);
        };
        form.notes = notes;

        let errors = form.validate();
        if !errors.is_empty() {
            for message in errors.messages() {
                failure(message);
            }
            let retry = Confirm::new("Correct the form?")
                .with_default(true)
                .prompt_skippable()
                .map_err(prompt_err)?;
            if retry != Some(true) {
                return Ok(None);
            }
            continue;
        }

        print_quote(&form.areas, form.plan);
        let save = Confirm::new("Save membership?")
            .with_default(true)
            .prompt_skippable()
            .map_err(prompt_err)?;
        match save {
            Some(true) => return Ok(Some(form)),
            Some(false) => {
                let again = Confirm::new("Edit the form again?")
                    .with_default(true)
                    .prompt_skippable()
                    .map_err(prompt_err)?;
                if again != Some(true) {
                    return Ok(None);
                }
            }
            None => return Ok(None),
        }
    }
}

/// TUI adapter. Inquire prompts over the membership use cases.
pub struct TuiInputPort {
    auth: Arc<AuthService>,
    memberships: Arc<MembershipService>,
    authorizer: Arc<ActionAuthorizer>,
}

impl TuiInputPort {
    pub fn new(
        auth: Arc<AuthService>,
        memberships: Arc<MembershipService>,
        authorizer: Arc<ActionAuthorizer>,
    ) -> Self {
        Self {
            auth,
            memberships,
            authorizer,
        }
    }

    async fn wait_out_lockout(&self, guard: Arc<AttemptGuardService>) -> Result<(), DomainError> {
        let countdown = LockoutCountdown::start(guard).await?;
        show_lockout(countdown).await;
        Ok(())
    }

    /// Returns false when the operator leaves instead of signing in.
    async fn login_screen(&self) -> Result<bool, DomainError> {
        self.auth.reset_session().await?;
        println!("{}", "Sign in".bold());
        loop {
            if let GuardStatus::Locked { .. } = self.auth.guard().refresh().await? {
                self.wait_out_lockout(Arc::clone(self.auth.guard())).await?;
                continue;
            }

            let Some(email) = Text::new("Email:")
                .with_validator(required("Email is required"))
                .prompt_skippable()
                .map_err(prompt_err)?
            else {
                return Ok(false);
            };
            let Some(password) = Password::new("Password:")
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .prompt_skippable()
                .map_err(prompt_err)?
            else {
                return Ok(false);
            };

            match with_spinner("Signing in...", self.auth.login(email.trim(), &password)).await {
                Ok(LoginOutcome::Authenticated(session)) => {
                    success(format!(
                        "Welcome, {}.",
                        session.user_email.as_deref().unwrap_or("admin")
                    ));
                    return Ok(true);
                }
                Ok(outcome) => failure(self.auth.describe(&outcome)),
                Err(e) => failure(e.user_message()),
            }
        }
    }

    async fn admin_menu(&self) -> Result<Flow, DomainError> {
        let mut filter = MembershipFilter::default();
        loop {
            let choice = Select::new("What do you want to do?", MainAction::ALL.to_vec())
                .prompt_skippable()
                .map_err(prompt_err)?;
            let result = match choice {
                None | Some(MainAction::SignOut) => return Ok(Flow::SignOut),
                Some(MainAction::Exit) => return Ok(Flow::Exit),
                Some(MainAction::Memberships) => self.browse(&mut filter).await,
                Some(MainAction::NewMembership) => self.create_membership().await,
                Some(MainAction::Calculator) => self.quote_calculator(),
                Some(MainAction::Export) => self.export(&filter).await,
                Some(MainAction::Stats) => self.show_stats().await,
            };
            match result {
                Err(e @ DomainError::Prompt(_)) => return Err(e),
                Err(e) => {
                    warn!(error = %e, "operation failed");
                    failure(e.user_message());
                }
                Ok(()) => {}
            }
        }
    }

    async fn load_records(&self) -> Result<Vec<MembershipRecord>, DomainError> {
        with_spinner("Loading memberships...", self.memberships.list()).await
    }

    async fn browse(&self, filter: &mut MembershipFilter) -> Result<(), DomainError> {
        const FIXED: usize = 4;
        let mut records = self.load_records().await?;
        loop {
            let visible = filter.apply(&records);
            println!(
                "{} of {} memberships{}",
                visible.len(),
                records.len(),
                describe_filter(filter)
            );

            let mut options = vec![
                "Search by name or phone".to_string(),
                "Filter by status".to_string(),
                "Clear filters".to_string(),
                "Reload".to_string(),
            ];
            options.extend(visible.iter().map(|r| summary_line(r)));

            let Some(choice) = Select::new("Memberships:", options)
                .with_page_size(PAGE_SIZE)
                .raw_prompt_skippable()
                .map_err(prompt_err)?
            else {
                return Ok(());
            };

            match choice.index {
                0 => {
                    let term = Text::new("Search:")
                        .with_initial_value(&filter.search)
                        .prompt_skippable()
                        .map_err(prompt_err)?;
                    if let Some(term) = term {
                        filter.search = term;
                    }
                }
                1 => {
                    let mut statuses = vec!["all".to_string()];
                    statuses.extend(MembershipStatus::ALL.iter().map(|s| s.label().to_string()));
                    let picked = Select::new("Status:", statuses)
                        .raw_prompt_skippable()
                        .map_err(prompt_err)?;
                    if let Some(picked) = picked {
                        filter.status = picked
                            .index
                            .checked_sub(1)
                            .and_then(|i| MembershipStatus::ALL.get(i).copied());
                    }
                }
                2 => *filter = MembershipFilter::default(),
                3 => records = self.load_records().await?,
                i => {
                    let record = visible[i - FIXED].clone();
                    if self.record_menu(record).await? {
                        records = self.load_records().await?;
                    }
                }
            }
        }
    }

    /// Returns true when the record changed and the list should be reloaded.
    async fn record_menu(&self, record: MembershipRecord) -> Result<bool, DomainError> {
        print_details(&record);
        let title = format!("{}:", record.client_name);
        let Some(action) = Select::new(&title, RecordAction::ALL.to_vec())
            .prompt_skippable()
            .map_err(prompt_err)?
        else {
            return Ok(false);
        };

        match action {
            RecordAction::ChangeStatus => {
                let cursor = MembershipStatus::ALL
                    .iter()
                    .position(|s| *s == record.status)
                    .unwrap_or(0);
                let Some(status) = Select::new("New status:", MembershipStatus::ALL.to_vec())
                    .with_starting_cursor(cursor)
                    .prompt_skippable()
                    .map_err(prompt_err)?
                else {
                    return Ok(false);
                };
                if status == record.status {
                    return Ok(false);
                }
                with_spinner("Saving...", self.memberships.set_status(&record.id, status))
                    .await?;
                success(format!("Status changed to {}.", status));
                Ok(true)
            }
            RecordAction::EditNotes => {
                let current = record.notes.clone().unwrap_or_default();
                let Some(notes) = Text::new("Notes:")
                    .with_initial_value(&current)
                    .with_help_message("leave empty to clear")
                    .prompt_skippable()
                    .map_err(prompt_err)?
                else {
                    return Ok(false);
                };
                with_spinner("Saving...", self.memberships.set_notes(&record.id, &notes)).await?;
                success("Notes saved.");
                Ok(true)
            }
            RecordAction::Edit => self.guarded(PendingAction::Edit(record)).await,
            RecordAction::Delete => self.guarded(PendingAction::Delete(record)).await,
            RecordAction::Back => Ok(false),
        }
    }

    async fn guarded(&self, action: PendingAction) -> Result<bool, DomainError> {
        let Some(action) = self.authorize(action).await? else {
            return Ok(false);
        };
        match action {
            PendingAction::Edit(record) => self.edit_membership(&record).await,
            PendingAction::Delete(record) => self.delete_membership(&record).await,
        }
    }

    /// PIN prompt loop. Yields the action once the PIN matches.
    async fn authorize(&self, action: PendingAction) -> Result<Option<PendingAction>, DomainError> {
        let mut challenge = match self.authorizer.request(action).await? {
            ActionRequest::Unavailable => {
                notice("Edit and delete are disabled: no action PIN is configured.");
                return Ok(None);
            }
            ActionRequest::Blocked { remaining_secs } => {
                failure(blocked_message(remaining_secs));
                self.offer_pin_countdown().await?;
                return Ok(None);
            }
            ActionRequest::Challenge(c) => c,
        };

        loop {
            let prompt = format!(
                "PIN to {} {}:",
                challenge.action().verb(),
                challenge.action().record().client_name
            );
            let Some(pin) = Password::new(&prompt)
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .prompt_skippable()
                .map_err(prompt_err)?
            else {
                return Ok(None);
            };

            let outcome = self.authorizer.submit(challenge, pin.trim()).await?;
            let message = self.authorizer.describe(&outcome);
            match outcome {
                PinOutcome::Authorized(action) => {
                    success(message);
                    return Ok(Some(action));
                }
                PinOutcome::WrongPin { challenge: next, .. } => {
                    failure(message);
                    challenge = next;
                }
                PinOutcome::LockedOut { .. } | PinOutcome::Blocked { .. } => {
                    failure(message);
                    self.offer_pin_countdown().await?;
                    return Ok(None);
                }
            }
        }
    }

    /// PIN lockouts are short enough that the operator may want to wait them out.
    async fn offer_pin_countdown(&self) -> Result<(), DomainError> {
        let wait = Confirm::new("Wait here until the PIN unlocks?")
            .with_default(false)
            .prompt_skippable()
            .map_err(prompt_err)?
            .unwrap_or(false);
        if wait {
            self.wait_out_lockout(Arc::clone(self.authorizer.guard()))
                .await?;
        }
        Ok(())
    }

    async fn create_membership(&self) -> Result<(), DomainError> {
        let Some(form) = fill_form(MembershipForm::new(today()), "New membership")? else {
            return Ok(());
        };
        let id = with_spinner("Saving...", self.memberships.create(&form)).await?;
        info!(id = %id, "membership saved from console");
        success(format!("Membership created for {}.", form.client_name.trim()));
        Ok(())
    }

    async fn edit_membership(&self, record: &MembershipRecord) -> Result<bool, DomainError> {
        let form = MembershipForm::from_record(record);
        let Some(form) = fill_form(form, "Edit membership")? else {
            return Ok(false);
        };
        with_spinner("Saving...", self.memberships.update(&record.id, &form)).await?;
        success("Membership updated.");
        Ok(true)
    }

    async fn delete_membership(&self, record: &MembershipRecord) -> Result<bool, DomainError> {
        let question = format!(
            "Delete the membership of {}? This cannot be undone.",
            record.client_name
        );
        let confirmed = Confirm::new(&question)
            .with_default(false)
            .prompt_skippable()
            .map_err(prompt_err)?;
        if confirmed != Some(true) {
            return Ok(false);
        }
        with_spinner("Deleting...", self.memberships.delete(&record.id)).await?;
        success("Membership deleted.");
        Ok(true)
    }

    /// Compare all three plans for a selection without saving anything.
    fn quote_calculator(&self) -> Result<(), DomainError> {
        let Some(areas) = select_areas(&[])? else {
            return Ok(());
        };
        if areas.is_empty() {
            notice("Select at least one area to get a quote.");
            return Ok(());
        }
        println!();
        println!(
            "  {} area(s): {}  →  {}",
            areas.len(),
            areas
                .areas()
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            areas.membership_type()
        );
        println!(
            "  {:<10} {:>9} {:>9} {:>9} {:>9}",
            "plan", "monthly", "initial", "sessions", "savings"
        );
        for tier in PlanTier::ALL {
            let q = areas.quote(tier);
            println!(
                "  {:<10} {:>9} {:>9} {:>9} {:>9}",
                tier.label(),
                format!("${}", q.monthly_payment),
                format!("${}", q.initial_payment),
                q.total_sessions,
                format!("${}", q.savings)
            );
        }
        if let Some(pct) = areas.quote(PlanTier::default()).discount_percent {
            println!("  volume discount applied: {}%", pct);
        }
        println!();
        Ok(())
    }

    async fn export(&self, filter: &MembershipFilter) -> Result<(), DomainError> {
        let records = self.load_records().await?;
        let visible: Vec<MembershipRecord> =
            filter.apply(&records).into_iter().cloned().collect();
        if visible.is_empty() {
            notice("There are no memberships to export.");
            return Ok(());
        }
        let path = with_spinner(
            "Exporting...",
            self.memberships.export_csv(&visible, today()),
        )
        .await?;
        success(format!(
            "Exported {} membership(s) to {}",
            visible.len(),
            path.display()
        ));
        Ok(())
    }

    async fn show_stats(&self) -> Result<(), DomainError> {
        let records = self.load_records().await?;
        print_stats(&MembershipStats::from_records(&records));
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            if !self.login_screen().await? {
                return Ok(());
            }
            if !self.auth.is_authenticated().await? {
                warn!("login screen returned without a session");
                failure("Sign-in did not complete. Please try again.");
                continue;
            }
            match self.admin_menu().await? {
                Flow::SignOut => {
                    self.auth.logout().await?;
                    success("Signed out.");
                }
                Flow::Exit => return Ok(()),
            }
        }
    }
}
