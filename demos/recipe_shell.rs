//! Recipe Planner Shell Demo
//!
//! A headless desktop shell: a main area and a sidebar, each with its own
//! history, driven by the navigation service. Run with
//! `RUST_LOG=debug cargo run --example recipe_shell` to see router logs.

use shell_navigator::{
    NavigationEvent, NavigationService, NavigatorOptions, RouteConfig, RouteParams, RouteTable,
    View, ViewArgs, ViewHost, ViewRef, ViewType, MAIN_CONTEXT,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const SIDEBAR: &str = "sidebar";

fn main() {
    env_logger::init();

    let routes = RouteTable::with_routes(|t| {
        t.register_route(
            RouteConfig::view("/dashboard", || Dashboard)
                .title("Dashboard")
                .cached(true)
                .lazy_load(false),
        );
        t.register_route(RouteConfig::view("/recipes/browse", || RecipeBrowser).title("Browse"));
        t.register_route(
            RouteConfig::new("/recipes/{id}", |cx| {
                let id = cx
                    .params()
                    .get_as::<u32>("id")
                    .ok_or("recipe id must be a number")?;
                let household = cx
                    .args()
                    .get::<String>("household")
                    .cloned()
                    .unwrap_or_default();
                Ok(Rc::new(RecipeEditor::new(id, household)) as ViewRef)
            })
            .title("Recipe")
            .cached(true),
        );
        t.register_route(
            RouteConfig::view("/shopping-list", || ShoppingList)
                .title("Shopping List")
                .view_type(ViewType::Embedded),
        );
    });

    let options = NavigatorOptions::new()
        .with_warm_cache(true)
        .with_view_args(ViewArgs::new().with("household", "Okafor".to_string()));

    let nav = match NavigationService::with_options(routes, Rc::new(ConsoleHost::new("main")), options)
    {
        Ok(nav) => nav,
        Err(err) => {
            eprintln!("failed to start shell: {err}");
            return;
        }
    };
    if let Err(err) = nav.add_context(SIDEBAR, Rc::new(ConsoleHost::new(SIDEBAR))) {
        eprintln!("{err}");
        return;
    }

    nav.subscribe(|event| match event {
        NavigationEvent::Failed {
            context,
            path,
            reason,
        } => println!("  ! [{context}] {path}: {reason}"),
        other => println!("  · [{}] {} {}", other.context(), other.name(), other.path()),
    });

    println!("== main area ==");
    show(&nav, "/dashboard");
    show(&nav, "/recipes/browse");
    show(&nav, "/recipes/12");

    // The editor has unsaved changes and refuses to be left
    show(&nav, "/dashboard");
    if let Some(view) = nav.get_current_view(MAIN_CONTEXT) {
        println!("  current view: {}", view.view_name());
    }

    println!("== sidebar ==");
    let _ = nav.navigate_to("/shopping-list", RouteParams::new(), SIDEBAR);
    let _ = nav.navigate_to("/recipes/browse", RouteParams::new(), SIDEBAR);
    let _ = nav.go_back(SIDEBAR);

    println!("== lookups ==");
    show(&nav, "/recipes/lasagna");
    show(&nav, "/pantry");
    if let Some(url) = nav.url_for("/recipes/{id}", &RouteParams::new().with("id", "7")) {
        println!("  url_for recipe 7: {url}");
    }

    for context in nav.context_names() {
        let title = nav.current_title(&context).unwrap_or_else(|| "-".into());
        let depth = nav.history(&context).map_or(0, |stack| stack.len());
        println!("  {context}: {title} ({depth} entries)");
    }
    let stats = nav.cache_stats();
    println!(
        "  cache: {} hits, {} misses, {} stored",
        stats.hits, stats.misses, stats.inserts
    );
}

fn show(nav: &NavigationService, path: &str) {
    match nav.navigate(path) {
        Ok(result) => println!("-> {path}: {result:?}"),
        Err(err) => println!("-> {path}: error: {err}"),
    }
}

/// Prints what it is asked to display.
struct ConsoleHost {
    name: &'static str,
    slot: RefCell<Option<ViewRef>>,
}

impl ConsoleHost {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: RefCell::new(None),
        }
    }
}

impl ViewHost for ConsoleHost {
    fn display(&self, view: ViewRef) {
        println!("  [{}] showing {}", self.name, view.view_name());
        *self.slot.borrow_mut() = Some(view);
    }

    fn current(&self) -> Option<ViewRef> {
        self.slot.borrow().clone()
    }
}

struct Dashboard;

impl View for Dashboard {
    fn view_name(&self) -> &'static str {
        "Dashboard"
    }
}

struct RecipeBrowser;

impl View for RecipeBrowser {
    fn view_name(&self) -> &'static str {
        "RecipeBrowser"
    }
}

struct ShoppingList;

impl View for ShoppingList {
    fn view_name(&self) -> &'static str {
        "ShoppingList"
    }
}

struct RecipeEditor {
    id: u32,
    household: String,
    dirty: Cell<bool>,
}

impl RecipeEditor {
    fn new(id: u32, household: String) -> Self {
        Self {
            id,
            household,
            dirty: Cell::new(false),
        }
    }
}

impl View for RecipeEditor {
    fn after_navigate_to(&self, path: &str, _params: &RouteParams) {
        println!(
            "  editing recipe {} for the {} household ({path})",
            self.id, self.household
        );
        self.dirty.set(true);
    }

    fn before_navigate_from(&self, next_path: &str, _next_params: &RouteParams) -> bool {
        if self.dirty.get() {
            println!("  recipe {} has unsaved changes; staying instead of {next_path}", self.id);
            return false;
        }
        true
    }

    fn view_name(&self) -> &'static str {
        "RecipeEditor"
    }
}
