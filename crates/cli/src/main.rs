use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use bus_admin::config::AdminConfig;
use bus_admin::form::{BusDraft, Draft, FormController, ScheduleDraft, UserDraft};
use bus_admin::guard::{Navigation, Route};
use bus_admin::models::{Booking, BookingStatus, PaymentStatus, Role, Ticket};
use bus_admin::session::FileStore;
use bus_admin::view::{
    table, BookingFilter, BusFilter, ListController, Reload, Resource, UserFilter, ViewState,
};
use bus_admin::{BusAdmin, Page};

const SESSION_FILE_ENV: &str = "BUS_ADMIN_SESSION_FILE";
const DEFAULT_SESSION_FILE: &str = ".bus-admin-session.json";

#[derive(Parser, Debug)]
#[clap(name = "bus-admin", version)]
#[clap(about = "Admin console for the bus ticketing platform", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// API base URL. If not provided, tries to read BUS_ADMIN_API_URL.
    #[clap(long, global = true)]
    api_url: Option<String>,

    /// Session file. If not provided, tries BUS_ADMIN_SESSION_FILE, then
    /// `.bus-admin-session.json` in the working directory.
    #[clap(long, global = true)]
    session_file: Option<PathBuf>,

    /// Output debug logs to stderr
    #[clap(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session
    Login {
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Summary counters and recent bookings
    Dashboard,
    /// List users
    Users {
        #[clap(long, default_value = "")]
        search: String,
        /// customer, admin or all
        #[clap(long, default_value = "all")]
        role: String,
        /// active, inactive or all
        #[clap(long, default_value = "all")]
        status: String,
    },
    /// List buses
    Buses {
        #[clap(long, default_value = "")]
        search: String,
        /// Company name or all
        #[clap(long, default_value = "all")]
        company: String,
        /// Print the distinct companies instead of the table
        #[clap(long)]
        companies: bool,
    },
    /// List schedules
    Schedules {
        #[clap(long, default_value = "")]
        search: String,
        /// active, inactive or all
        #[clap(long, default_value = "all")]
        status: String,
        /// Only schedules of this bus
        #[clap(long)]
        bus: Option<String>,
    },
    /// List bookings
    Bookings {
        #[clap(long, default_value = "")]
        search: String,
        /// booked, cancelled, completed, expired or all
        #[clap(long, default_value = "all")]
        status: String,
        /// Show the detail panel of one booking
        #[clap(long)]
        show: Option<String>,
    },
    /// Print tickets for the matching bookings
    Tickets {
        #[clap(long, default_value = "")]
        search: String,
    },
    /// Set the status of a booking
    BookingStatus { id: String, status: String },
    /// Set the payment status of a booking
    PaymentStatus { id: String, status: String },
    /// Set a schedule active or inactive
    ScheduleStatus { id: String, status: String },
    /// Mark a booked seat completed
    Complete { id: String },
    /// Cancel a booked seat
    CancelBooking {
        id: String,
        /// Skip the confirmation prompt
        #[clap(long)]
        yes: bool,
    },
    /// Expire schedules whose date has passed
    UpdateExpired,
    /// Delete a user, bus or schedule
    Delete {
        #[clap(value_enum)]
        entity: Entity,
        id: String,
        /// Skip the confirmation prompt
        #[clap(long)]
        yes: bool,
    },
    /// Create a user, or edit one with --id
    SaveUser {
        #[clap(long)]
        id: Option<String>,
        #[clap(long)]
        username: Option<String>,
        #[clap(long)]
        email: Option<String>,
        /// Leave out on edit to keep the current password
        #[clap(long)]
        password: Option<String>,
        #[clap(long)]
        phone: Option<String>,
        #[clap(long)]
        role: Option<String>,
        #[clap(long)]
        active: Option<bool>,
    },
    /// Create a bus, or edit one with --id
    SaveBus {
        #[clap(long)]
        id: Option<String>,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        company: Option<String>,
        #[clap(long)]
        license_plate: Option<String>,
        #[clap(long)]
        capacity: Option<String>,
        #[clap(long)]
        phone: Option<String>,
    },
    /// Create a schedule, or edit one with --id
    SaveSchedule {
        #[clap(long)]
        id: Option<String>,
        #[clap(long)]
        from: Option<String>,
        #[clap(long)]
        to: Option<String>,
        #[clap(long)]
        bus: Option<String>,
        /// YYYY-MM-DD
        #[clap(long)]
        date: Option<String>,
        #[clap(long)]
        departure: Option<String>,
        #[clap(long)]
        arrival: Option<String>,
        #[clap(long)]
        duration: Option<String>,
        #[clap(long)]
        price: Option<String>,
        #[clap(long)]
        seats: Option<String>,
        #[clap(long)]
        status: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Entity {
    User,
    Bus,
    Schedule,
}

fn init_logging(debug: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Warn);
        }
    }
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = match cli.api_url.as_deref() {
        Some(url) => AdminConfig::new(url)?,
        None => AdminConfig::from_env()?,
    };
    let session_file = cli
        .session_file
        .or_else(|| env::var(SESSION_FILE_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let admin = BusAdmin::new(config, Arc::new(FileStore::new(&session_file)))
        .with_context(|| format!("Failed to open session file {:?}", session_file))?;

    match cli.command {
        Commands::Login { email, password } => {
            let auth = admin.auth();
            let credentials = auth
                .login(&email, &password)
                .await
                .map_err(|err| anyhow!(bus_admin::auth::Auth::failure_message(&err)))?;
            let name = credentials
                .profile
                .as_ref()
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|| email.clone());
            println!("Logged in as {}", name);
        }
        Commands::Logout => {
            admin.auth().logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => match admin.auth().current_user() {
            Some(profile) => println!(
                "{} <{}> ({})",
                profile.display_name(),
                profile.email.as_deref().unwrap_or("-"),
                profile.role.as_deref().unwrap_or("-")
            ),
            None if admin.session().is_authenticated() => println!("Logged in, no profile stored"),
            None => println!("Not logged in"),
        },
        Commands::Dashboard => dashboard(&admin).await?,
        Commands::Users {
            search,
            role,
            status,
        } => {
            let mut users = match open(&admin, Route::Users).await? {
                Page::Users(users) => users,
                _ => return Err(wrong_page()),
            };
            ensure_ready(users.state())?;
            users.search(&search);
            users.set_filter(UserFilter {
                role: role.parse()?,
                status: status.parse()?,
            });
            print_list(&users);
        }
        Commands::Buses {
            search,
            company,
            companies,
        } => {
            let mut buses = match open(&admin, Route::Buses).await? {
                Page::Buses(buses) => buses,
                _ => return Err(wrong_page()),
            };
            ensure_ready(buses.state())?;
            if companies {
                for company in buses.companies() {
                    println!("{}", company);
                }
                return Ok(());
            }
            buses.search(&search);
            buses.set_filter(BusFilter {
                company: if company.eq_ignore_ascii_case("all") {
                    Default::default()
                } else {
                    bus_admin::view::Category::Only(company)
                },
            });
            print_list(&buses);
        }
        Commands::Schedules {
            search,
            status,
            bus,
        } => {
            let mut page = match open(&admin, Route::Schedules { bus_id: bus }).await? {
                Page::Schedules(page) => page,
                _ => return Err(wrong_page()),
            };
            ensure_ready(page.schedules().state())?;
            println!("{}\n", page.title());
            page.schedules_mut().search(&search);
            page.schedules_mut().filter_mut().status = status.parse()?;
            print_list(page.schedules());
        }
        Commands::Bookings {
            search,
            status,
            show,
        } => {
            let mut bookings = open_bookings(&admin).await?;
            if let Some(id) = show {
                let booking = bookings
                    .select(&id)
                    .ok_or_else(|| anyhow!("No booking with id {}", id))?;
                for (label, value) in table::booking_details(booking) {
                    println!("{:<12}{}", label, value);
                }
                return Ok(());
            }
            bookings.search(&search);
            bookings.set_filter(BookingFilter {
                status: status.parse()?,
            });
            print_list(&bookings);
        }
        Commands::Tickets { search } => {
            let mut bookings = open_bookings(&admin).await?;
            let mut page = admin.schedules(None);
            page.load().await?;
            bookings.search(&search);
            let visible: Vec<Booking> = bookings.visible().into_iter().cloned().collect();
            let tickets = Ticket::project_all(&visible, page.schedules().items(), page.buses().items());
            print!("{}", table::render(&tickets));
        }
        Commands::BookingStatus { id, status } => {
            let status: BookingStatus = status.parse()?;
            let mut bookings = open_bookings(&admin).await?;
            let result = bookings.set_status(&id, status).await;
            report(&bookings, &id, result)?;
        }
        Commands::PaymentStatus { id, status } => {
            let status: PaymentStatus = status.parse()?;
            let mut bookings = open_bookings(&admin).await?;
            let result = bookings.set_payment_status(&id, status).await;
            report(&bookings, &id, result)?;
        }
        Commands::ScheduleStatus { id, status } => {
            let status: bus_admin::models::ScheduleStatus = status.parse()?;
            let mut page = match open(&admin, Route::Schedules { bus_id: None }).await? {
                Page::Schedules(page) => page,
                _ => return Err(wrong_page()),
            };
            ensure_ready(page.schedules().state())?;
            let schedules = page.schedules_mut();
            if let Err(err) = schedules.set_status(&id, status).await {
                return Err(anyhow!(schedules
                    .alert()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string())));
            }
            print_list(page.schedules());
        }
        Commands::Complete { id } => {
            let mut bookings = open_bookings(&admin).await?;
            let result = bookings.complete(&id).await;
            report(&bookings, &id, result)?;
        }
        Commands::CancelBooking { id, yes } => {
            let mut bookings = open_bookings(&admin).await?;
            let confirmation = bookings.request_cancel(&id)?;
            if !yes && !confirm(confirmation.prompt())? {
                println!("Nothing changed.");
                return Ok(());
            }
            let result = bookings.confirm_cancel(confirmation).await;
            report(&bookings, &id, result)?;
        }
        Commands::UpdateExpired => {
            let mut page = match open(&admin, Route::Schedules { bus_id: None }).await? {
                Page::Schedules(page) => page,
                _ => return Err(wrong_page()),
            };
            let message = page
                .update_expired()
                .await
                .map_err(|err| anyhow!(page.alert().map(str::to_string).unwrap_or_else(|| err.to_string())))?;
            println!("{}", message);
        }
        Commands::Delete { entity, id, yes } => match entity {
            Entity::User => match open(&admin, Route::Users).await? {
                Page::Users(mut users) => delete(&mut users, &id, yes).await?,
                _ => return Err(wrong_page()),
            },
            Entity::Bus => match open(&admin, Route::Buses).await? {
                Page::Buses(mut buses) => delete(&mut buses, &id, yes).await?,
                _ => return Err(wrong_page()),
            },
            Entity::Schedule => match open(&admin, Route::Schedules { bus_id: None }).await? {
                Page::Schedules(mut page) => delete(page.schedules_mut(), &id, yes).await?,
                _ => return Err(wrong_page()),
            },
        },
        Commands::SaveUser {
            id,
            username,
            email,
            password,
            phone,
            role,
            active,
        } => {
            let mut users = match open(&admin, Route::Users).await? {
                Page::Users(users) => users,
                _ => return Err(wrong_page()),
            };
            ensure_ready(users.state())?;
            let mut form = admin.form::<UserDraft>();
            open_form(&mut form, &users, id.as_deref())?;

            let draft = form.draft_mut();
            set(&mut draft.username, username);
            set(&mut draft.email, email);
            set(&mut draft.password, password);
            set(&mut draft.phone, phone);
            if let Some(role) = role {
                draft.role = role.parse::<Role>()?;
            }
            if let Some(active) = active {
                draft.is_active = active;
            }

            submit(&mut form, &mut users).await?;
            print_list(&users);
        }
        Commands::SaveBus {
            id,
            name,
            company,
            license_plate,
            capacity,
            phone,
        } => {
            let mut buses = match open(&admin, Route::Buses).await? {
                Page::Buses(buses) => buses,
                _ => return Err(wrong_page()),
            };
            ensure_ready(buses.state())?;
            let mut form = admin.form::<BusDraft>();
            open_form(&mut form, &buses, id.as_deref())?;

            let draft = form.draft_mut();
            set(&mut draft.name, name);
            set(&mut draft.company, company);
            set(&mut draft.license_plate, license_plate);
            set(&mut draft.capacity, capacity);
            set(&mut draft.phone, phone);

            submit(&mut form, &mut buses).await?;
            print_list(&buses);
        }
        Commands::SaveSchedule {
            id,
            from,
            to,
            bus,
            date,
            departure,
            arrival,
            duration,
            price,
            seats,
            status,
        } => {
            let mut page = match open(&admin, Route::Schedules { bus_id: None }).await? {
                Page::Schedules(page) => page,
                _ => return Err(wrong_page()),
            };
            ensure_ready(page.schedules().state())?;
            let mut form = admin.form::<ScheduleDraft>();
            match id.as_deref() {
                Some(_) => open_form(&mut form, page.schedules(), id.as_deref())?,
                None => form.open_create_for(&page),
            }

            let draft = form.draft_mut();
            set(&mut draft.from, from);
            set(&mut draft.to, to);
            set(&mut draft.bus_id, bus);
            set(&mut draft.date, date);
            set(&mut draft.departure_time, departure);
            set(&mut draft.arrival_time, arrival);
            set(&mut draft.duration, duration);
            set(&mut draft.price, price);
            set(&mut draft.available_seats, seats);
            if let Some(status) = status {
                draft.status = status.parse()?;
            }

            submit(&mut form, &mut page).await?;
            print_list(page.schedules());
        }
    }

    Ok(())
}

/// Resolve a route through the session guard and load it
async fn open(admin: &BusAdmin, route: Route) -> anyhow::Result<Page> {
    let (navigation, page) = admin.open(&route.path()).await;
    if let Navigation::Redirect(Route::Login) = navigation {
        bail!("Not logged in. Run `bus-admin login <email> --password <password>` first.");
    }
    Ok(page)
}

async fn open_bookings(admin: &BusAdmin) -> anyhow::Result<ListController<Booking>> {
    match open(admin, Route::Bookings).await? {
        Page::Bookings(bookings) => {
            ensure_ready(bookings.state())?;
            Ok(bookings)
        }
        _ => Err(wrong_page()),
    }
}

fn wrong_page() -> anyhow::Error {
    anyhow!("Route resolved to an unexpected page")
}

fn ensure_ready(state: &ViewState) -> anyhow::Result<()> {
    match state {
        ViewState::Failed(message) => bail!("{}", message),
        _ => Ok(()),
    }
}

async fn dashboard(admin: &BusAdmin) -> anyhow::Result<()> {
    let dashboard = match open(admin, Route::Dashboard).await? {
        Page::Dashboard(dashboard) => dashboard,
        _ => return Err(wrong_page()),
    };
    if let ViewState::Failed(message) = dashboard.state() {
        eprintln!("Dashboard unavailable: {}", message);
    }

    for card in dashboard.stats().cards() {
        println!("{:<20}{}", card.label, card.value);
    }
    println!("\nRecent Bookings");
    if dashboard.recent_bookings().is_empty() {
        println!("No recent bookings found");
    } else {
        print!("{}", table::render(&dashboard.recent_rows()));
    }
    Ok(())
}

fn print_list<R>(list: &ListController<R>)
where
    R: Resource + table::Tabular,
{
    let visible = list.visible();
    let shown = visible.len();
    print!("{}", table::render(visible));
    println!("{} of {} {}s", shown, list.items().len(), R::NOUN);
}

/// Print the patched booking, or turn the controller's alert into the error
fn report(
    bookings: &ListController<Booking>,
    id: &str,
    result: bus_admin::error::Result<()>,
) -> anyhow::Result<()> {
    if let Err(err) = result {
        return Err(anyhow!(bookings
            .alert()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string())));
    }
    if let Some(booking) = bookings.find(id) {
        print!("{}", table::render([booking]));
    }
    Ok(())
}

async fn delete<R: Resource>(list: &mut ListController<R>, id: &str, yes: bool) -> anyhow::Result<()> {
    ensure_ready(list.state())?;
    let confirmation = list.request_delete(id)?;
    if !yes && !confirm(confirmation.prompt())? {
        list.cancel_delete(confirmation);
        println!("Nothing deleted.");
        return Ok(());
    }
    if let Err(err) = list.confirm_delete(confirmation).await {
        return Err(anyhow!(list.alert().map(str::to_string).unwrap_or_else(|| err.to_string())));
    }
    println!("Deleted {} {}.", R::NOUN, id);
    Ok(())
}

fn open_form<D: Draft>(
    form: &mut FormController<D>,
    list: &ListController<D::Record>,
    id: Option<&str>,
) -> anyhow::Result<()> {
    match id {
        Some(id) => {
            let record = list
                .find(id)
                .ok_or_else(|| anyhow!("No {} with id {}", <D::Record as Resource>::NOUN, id))?;
            form.open_edit(record);
        }
        None => form.open_create(),
    }
    Ok(())
}

async fn submit<D, O>(form: &mut FormController<D>, owner: &mut O) -> anyhow::Result<()>
where
    D: Draft,
    O: Reload,
{
    if let Err(err) = form.submit(owner).await {
        return Err(anyhow!(form.alert().map(str::to_string).unwrap_or_else(|| err.to_string())));
    }
    println!("Saved.");
    Ok(())
}

fn set(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
