//! Personal time-tracking list.
//!
//! Presents the activities from a tab-separated file six rows at a time.
//! Tapping a row makes that activity the current one; the previously running
//! activity is closed out into an append-only span log.

use crate::apps::App;
use crate::error::Result;
use crate::hal::{Event, EventMask, Font, HostContext, SwipeDirection};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const DIRECTORY: &str = "timeto";
const ACTIVITIES_FILE: &str = "activities.txt";
const CURRENT_FILE: &str = "current.txt";
const LOG_FILE: &str = "log.txt";

const ROWS_PER_PAGE: usize = 6;

// List geometry: one row per 30 px starting below the title area.
const LIST_X: u32 = 10;
const LIST_TOP: u32 = 60;
const ROW_PITCH: u32 = 30;
const ROW_WIDTH: u32 = 220;

const DEFAULT_ACTIVITIES: [(&str, u32); 9] = [
    ("Meditation", 1200),
    ("Work", 2400),
    ("Hobby", 3600),
    ("Personal development", 1800),
    ("Exercises / Health", 1200),
    ("Walk", 1800),
    ("Getting ready", 1800),
    ("Sleep / Rest", 28800),
    ("Other", 3600),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub timer_secs: u32,
}

fn parse_activities(content: &str) -> Vec<Activity> {
    let mut activities = Vec::new();
    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        match fields.as_slice() {
            [id, name, timer] => match timer.parse() {
                Ok(timer_secs) => activities.push(Activity {
                    id: (*id).to_owned(),
                    name: (*name).to_owned(),
                    timer_secs,
                }),
                Err(_) => log::warn!("timeto: invalid timer in line '{}'", line),
            },
            _ => log::warn!("timeto: illegal line format: '{}'", line),
        }
    }
    activities
}

pub struct TimetoApp {
    activities: Vec<Activity>,
    page: usize,
    current_id: Option<String>,
}

impl TimetoApp {
    pub fn new() -> Self {
        TimetoApp {
            activities: Vec::new(),
            page: 0,
            current_id: None,
        }
    }

    fn data_dir(host: &dyn HostContext) -> PathBuf {
        host.data_dir().join(DIRECTORY)
    }

    /// Create the data directory and seed the activities file with the
    /// default template on first run.
    fn ensure_files(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let activities = dir.join(ACTIVITIES_FILE);
        if !activities.exists() {
            let epoch = chrono::Utc::now().timestamp();
            let mut template = String::from("# ID\tNAME\tTIMER\n");
            for (offset, (name, timer)) in DEFAULT_ACTIVITIES.iter().enumerate() {
                template.push_str(&format!("{}\t{}\t{}\n", epoch + offset as i64, name, timer));
            }
            fs::write(&activities, template)?;
            log::info!("timeto: seeded {}", activities.display());
        }
        Ok(())
    }

    fn num_pages(&self) -> usize {
        ((self.activities.len() + ROWS_PER_PAGE - 1) / ROWS_PER_PAGE).max(1)
    }

    fn page_slice(&self) -> &[Activity] {
        let start = self.page * ROWS_PER_PAGE;
        let end = (start + ROWS_PER_PAGE).min(self.activities.len());
        &self.activities[start..end]
    }

    /// Make the tapped activity current and close the span of the previous
    /// one into the log.
    fn select(&mut self, index: usize, host: &mut dyn HostContext) -> Result<()> {
        let activity = match self.activities.get(index) {
            Some(activity) => activity.clone(),
            None => return Ok(()),
        };

        let dir = Self::data_dir(host);
        let now = chrono::Utc::now().timestamp();
        let current_path = dir.join(CURRENT_FILE);

        if let Ok(previous) = fs::read_to_string(&current_path) {
            let fields: Vec<&str> = previous.trim_end().split('\t').collect();
            if let [id, start] = fields.as_slice() {
                let mut log_file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join(LOG_FILE))?;
                writeln!(log_file, "{}\t{}\t{}", id, start, now)?;
            } else {
                log::warn!("timeto: discarding malformed current entry");
            }
        }

        fs::write(&current_path, format!("{}\t{}\n", activity.id, now))?;
        log::info!("timeto: started '{}'", activity.name);
        self.current_id = Some(activity.id);
        self.draw(host);
        Ok(())
    }

    fn draw(&self, host: &mut dyn HostContext) {
        let theme = host.theme();
        let page = self.page_slice();
        let more_above = self.page > 0;
        let more_below = self.page + 1 < self.num_pages();

        let rows: Vec<String> = page
            .iter()
            .map(|activity| {
                if self.current_id.as_ref() == Some(&activity.id) {
                    format!("* {}", activity.name)
                } else {
                    activity.name.clone()
                }
            })
            .collect();

        let display = host.display();
        display.fill(0x0000, 0);
        display.set_font(Font::Sans18);
        display.set_color(theme.mid);
        for (row, name) in rows.iter().enumerate() {
            display.string(name, LIST_X, LIST_TOP + row as u32 * ROW_PITCH, ROW_WIDTH);
        }

        display.set_color(theme.bright);
        if more_above {
            display.string("^", 228, 6, 12);
        }
        if more_below {
            display.string("v", 228, 216, 12);
        }
    }
}

impl Default for TimetoApp {
    fn default() -> Self {
        TimetoApp::new()
    }
}

impl App for TimetoApp {
    fn name(&self) -> &'static str {
        "TimeTo"
    }

    fn foreground(&mut self, host: &mut dyn HostContext) -> Result<()> {
        let dir = Self::data_dir(host);
        Self::ensure_files(&dir)?;

        self.activities = parse_activities(&fs::read_to_string(dir.join(ACTIVITIES_FILE))?);
        self.current_id = fs::read_to_string(dir.join(CURRENT_FILE))
            .ok()
            .and_then(|content| {
                content
                    .trim_end()
                    .split('\t')
                    .next()
                    .map(|id| id.to_owned())
            });
        self.page = self.page.min(self.num_pages() - 1);

        host.request_events(EventMask::TOUCH | EventMask::SWIPE_UPDOWN);
        self.draw(host);
        Ok(())
    }

    fn handle(&mut self, event: Event, host: &mut dyn HostContext) -> Result<()> {
        match event {
            Event::Swipe(SwipeDirection::Up) => {
                if self.page + 1 >= self.num_pages() {
                    host.vibrate();
                } else {
                    self.page += 1;
                    self.draw(host);
                }
            }
            Event::Swipe(SwipeDirection::Down) => {
                if self.page == 0 {
                    host.switch_app();
                } else {
                    self.page -= 1;
                    self.draw(host);
                }
            }
            Event::Touch { y, .. } => {
                if y >= LIST_TOP {
                    let row = (y / ROW_PITCH) as usize - 2;
                    if row < ROWS_PER_PAGE {
                        self.select(self.page * ROWS_PER_PAGE + row, host)?;
                    }
                }
            }
            Event::Button(_) | Event::Tick => {}
        }
        Ok(())
    }
}
