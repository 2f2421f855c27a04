extern crate armlet as lib;

use flexi_logger::{FileSpec, Logger};
use lib::apps::month::MonthApp;
use lib::apps::timeto::TimetoApp;
use lib::apps::App;
use lib::cmds::Cmd;
use lib::events::{Dispatcher, HostEvent};
use lib::hal::{Event, EventMask, HostContext, SwipeDirection};
use lib::term::TermHost;
use std::io::{stdout, Write};
use std::path::PathBuf;
use structopt::StructOpt;
use termion::raw::IntoRawMode;
use termion::screen::AlternateScreen;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "armlet",
    about = "Calendar and time-tracking apps for wrist-worn displays, hosted in a terminal."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only render the selected app once, non-interactively"
    )]
    pub show: bool,

    #[structopt(
        short = "a",
        long = "app",
        default_value = "month",
        help = "application to start (month|timeto)"
    )]
    pub app: String,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

/// Convert a bound command into the event the foregrounded app subscribed to.
fn event_for(cmd: Cmd, mask: EventMask) -> Option<Event> {
    match cmd {
        Cmd::SwipeUp if mask.contains(EventMask::SWIPE_UPDOWN) => {
            Some(Event::Swipe(SwipeDirection::Up))
        }
        Cmd::SwipeDown if mask.contains(EventMask::SWIPE_UPDOWN) => {
            Some(Event::Swipe(SwipeDirection::Down))
        }
        Cmd::Button if mask.contains(EventMask::BUTTON) => Some(Event::Button(true)),
        Cmd::SelectRow(row) if mask.contains(EventMask::TOUCH) => Some(Event::Touch {
            x: 120,
            y: 75 + 30 * row as u32,
        }),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        println!("armlet ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let key_map = config.key_map();

    let mut host = TermHost::new(&config);
    let mut apps: Vec<Box<dyn App>> = vec![
        Box::new(MonthApp::new(host.localtime())),
        Box::new(TimetoApp::new()),
    ];
    let mut active = match args.app.as_str() {
        "timeto" => 1,
        _ => 0,
    };

    if args.show {
        apps[active].foreground(&mut host)?;
        print!("{}", host.surface().render_plain());
        return Ok(());
    }

    let dispatcher = Dispatcher::from_config(&config);

    let stdout = stdout();
    let mut screen = AlternateScreen::from(stdout.lock().into_raw_mode()?);
    write!(screen, "{}", termion::cursor::Hide)?;

    apps[active].foreground(&mut host)?;
    present(&mut screen, &host)?;

    loop {
        match dispatcher.next()? {
            HostEvent::Tick => {
                if host.tick_period().is_some() {
                    apps[active].handle(Event::Tick, &mut host)?;
                }
            }
            HostEvent::Input(key) => match key_map.get(&key).copied() {
                Some(Cmd::Exit) => break,
                Some(Cmd::SwitchApp) => {
                    active = (active + 1) % apps.len();
                    log::info!("switching to app '{}'", apps[active].name());
                    host.clear_subscriptions();
                    apps[active].foreground(&mut host)?;
                }
                Some(cmd) => {
                    if let Some(event) = event_for(cmd, host.requested_events()) {
                        apps[active].handle(event, &mut host)?;
                    }
                }
                None => {}
            },
        }

        if host.take_switch_request() {
            active = (active + 1) % apps.len();
            log::info!("switching to app '{}'", apps[active].name());
            host.clear_subscriptions();
            apps[active].foreground(&mut host)?;
        }
        if host.take_vibration() {
            // closest a terminal gets to a haptic pulse
            write!(screen, "\x07")?;
        }

        present(&mut screen, &host)?;
    }

    write!(screen, "{}", termion::cursor::Show)?;
    Ok(())
}

fn present<W: Write>(screen: &mut W, host: &TermHost) -> std::io::Result<()> {
    write!(screen, "{}", termion::cursor::Goto(1, 1))?;
    host.surface().render_to(screen)?;
    screen.flush()
}
