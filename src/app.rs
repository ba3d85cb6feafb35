use anyhow::{Context, Result};
use gtk4::prelude::*;
use gtk4::{gio, Application};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tokio::runtime::Runtime;

use crate::config::ShowcaseConfig;
use crate::ui::LandingWindow;

const APP_ID: &str = "com.showcase.LandingPage";
/// Decode workers; the sweep is sequential so a small pool is plenty.
const DECODE_WORKERS: usize = 2;

pub struct ShowcaseApp {
    app: Application,
    // Kept alive for the lifetime of the GTK main loop
    _runtime: Rc<Runtime>,
}

impl ShowcaseApp {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(DECODE_WORKERS)
            .thread_name("showcase-decode")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime for image decoding")?;
        let runtime = Rc::new(runtime);

        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        let windows: Rc<RefCell<Vec<Rc<LandingWindow>>>> = Rc::default();

        let rt = runtime.clone();
        let open_windows = windows.clone();
        app.connect_activate(move |app| {
            Self::present_window(app, None, &rt, &open_windows);
        });

        let rt = runtime.clone();
        let open_windows = windows.clone();
        app.connect_open(move |app, files, _hint| {
            let path = files.first().and_then(|f| f.path());
            Self::present_window(app, path.as_deref(), &rt, &open_windows);
        });

        Ok(Self {
            app,
            _runtime: runtime,
        })
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn present_window(
        app: &Application,
        photo_dir: Option<&Path>,
        runtime: &Runtime,
        windows: &Rc<RefCell<Vec<Rc<LandingWindow>>>>,
    ) {
        let config = ShowcaseConfig::from_env(photo_dir);
        tracing::debug!(?config, "Opening showcase window");

        let window = LandingWindow::new(app, config, runtime.handle().clone());

        let open_windows = Rc::downgrade(windows);
        let closed = Rc::downgrade(&window);
        window.connect_close_request(move || {
            if let (Some(open_windows), Some(closed)) = (open_windows.upgrade(), closed.upgrade()) {
                forget_window(&mut open_windows.borrow_mut(), &closed);
                tracing::debug!("Showcase window closed");
            }
        });

        window.present();
        windows.borrow_mut().push(window);
    }
}

/// Drop the app's handle on a closed window so its widgets can be freed
fn forget_window<T>(windows: &mut Vec<Rc<T>>, closed: &Rc<T>) {
    windows.retain(|window| !Rc::ptr_eq(window, closed));
}
