//! Test utilities for the catalog enricher test suite
//!
//! `FakeBrowser` is an in-memory `BrowserDriver`: pages are maps from
//! selector to element nodes, elements can own nested selector maps, and a
//! catalog page can grow in batches each time its load-more control is
//! clicked. Tabs, redirects, failing and hanging navigations are modelled
//! so tab-scope and timeout behavior can be asserted.

#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use catalog_enricher::EnrichConfig;
use catalog_enricher::driver::BrowserDriver;

pub const CATALOG_URL: &str = "https://spot.example.org/fr/sheet/926247/catalog";
pub const BASE_URL: &str = "https://spot.example.org";

pub type NodeId = usize;
pub type TabId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeElement(NodeId);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    Nothing,
    Select,
    Navigate(String),
    LoadMore,
}

/// Declarative description of one element and its subtree.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    text: String,
    attrs: Vec<(String, String)>,
    children: Vec<(String, NodeSpec)>,
    actionable: bool,
    selected: bool,
    on_click: ClickAction,
}

impl NodeSpec {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            attrs: Vec::new(),
            children: Vec::new(),
            actionable: true,
            selected: false,
            on_click: ClickAction::Nothing,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::empty()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, selector: impl Into<String>, node: NodeSpec) -> Self {
        self.children.push((selector.into(), node));
        self
    }

    pub fn inert(mut self) -> Self {
        self.actionable = false;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn on_click(mut self, action: ClickAction) -> Self {
        self.on_click = action;
        self
    }
}

/// Catalog that shows `batches[i]` entries after `i` load-more clicks.
#[derive(Debug, Clone)]
pub struct LoadMoreSpec {
    pub item_selector: String,
    pub control_selector: String,
    pub items: Vec<NodeSpec>,
    pub batches: Vec<usize>,
    pub control_actionable: bool,
    /// Keep rendering the control after the last batch (stall case)
    pub control_outlives_last_batch: bool,
}

#[derive(Debug, Clone)]
pub struct PageSpec {
    ready: bool,
    root: Vec<(String, NodeSpec)>,
    load_more: Option<LoadMoreSpec>,
}

impl PageSpec {
    pub fn new() -> Self {
        Self {
            ready: true,
            root: Vec::new(),
            load_more: None,
        }
    }

    pub fn never_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn with(mut self, selector: impl Into<String>, node: NodeSpec) -> Self {
        self.root.push((selector.into(), node));
        self
    }

    pub fn with_load_more(mut self, spec: LoadMoreSpec) -> Self {
        self.load_more = Some(spec);
        self
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::new()
    }
}

struct Node {
    text: String,
    attrs: HashMap<String, String>,
    children: HashMap<String, Vec<NodeId>>,
    actionable: bool,
    selected: bool,
    on_click: ClickAction,
}

struct LoadMore {
    item_selector: String,
    control_selector: String,
    items: Vec<NodeId>,
    batches: Vec<usize>,
    stage: usize,
    control: NodeId,
    control_outlives_last_batch: bool,
}

impl LoadMore {
    fn visible_items(&self) -> Vec<NodeId> {
        let shown = self.batches.get(self.stage).copied().unwrap_or(0);
        self.items.iter().copied().take(shown).collect()
    }

    fn control_visible(&self) -> bool {
        self.stage + 1 < self.batches.len() || self.control_outlives_last_batch
    }
}

struct Page {
    ready: bool,
    root: HashMap<String, Vec<NodeId>>,
    load_more: Option<LoadMore>,
}

struct Tab {
    id: TabId,
    url: String,
}

#[derive(Default)]
struct State {
    nodes: Vec<Node>,
    pages: HashMap<String, Page>,
    redirects: HashMap<String, String>,
    failing_urls: HashSet<String>,
    hanging_urls: HashSet<String>,
    invalid_selectors: HashSet<String>,
    tabs: Vec<Tab>,
    next_tab: TabId,
    focused: Option<TabId>,
    max_open_tabs: usize,
    navigations: Vec<String>,
    load_more_clicks: usize,
    screenshots: usize,
}

impl State {
    fn insert(&mut self, spec: NodeSpec) -> NodeId {
        let mut children: HashMap<String, Vec<NodeId>> = HashMap::new();
        for (selector, child) in spec.children {
            let id = self.insert(child);
            children.entry(selector).or_default().push(id);
        }
        self.nodes.push(Node {
            text: spec.text,
            attrs: spec.attrs.into_iter().collect(),
            children,
            actionable: spec.actionable,
            selected: spec.selected,
            on_click: spec.on_click,
        });
        self.nodes.len() - 1
    }

    fn focused_tab(&self) -> Result<&Tab> {
        let focused = self.focused.ok_or_else(|| anyhow!("no tab has focus"))?;
        self.tabs
            .iter()
            .find(|tab| tab.id == focused)
            .ok_or_else(|| anyhow!("focused tab {focused} is closed"))
    }

    fn focused_url(&self) -> Result<String> {
        Ok(self.focused_tab()?.url.clone())
    }

    fn node(&self, element: &FakeElement) -> Result<&Node> {
        self.nodes
            .get(element.0)
            .ok_or_else(|| anyhow!("stale element {}", element.0))
    }
}

pub struct FakeBrowser {
    state: Mutex<State>,
}

impl FakeBrowser {
    /// Browser with one primary tab (id 0) focused on `about:blank`.
    pub fn new() -> Self {
        let state = State {
            tabs: vec![Tab {
                id: 0,
                url: "about:blank".to_string(),
            }],
            next_tab: 1,
            focused: Some(0),
            max_open_tabs: 1,
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn add_page(&self, url: &str, spec: PageSpec) {
        let mut state = self.state.lock().unwrap();

        let mut root: HashMap<String, Vec<NodeId>> = HashMap::new();
        for (selector, node) in spec.root {
            let id = state.insert(node);
            root.entry(selector).or_default().push(id);
        }

        let load_more = spec.load_more.map(|lm| {
            let items = lm.items.into_iter().map(|item| state.insert(item)).collect();
            let mut control = NodeSpec::text("Voir plus").on_click(ClickAction::LoadMore);
            if !lm.control_actionable {
                control = control.inert();
            }
            LoadMore {
                item_selector: lm.item_selector,
                control_selector: lm.control_selector,
                items,
                batches: lm.batches,
                stage: 0,
                control: state.insert(control),
                control_outlives_last_batch: lm.control_outlives_last_batch,
            }
        });

        state.pages.insert(
            url.to_string(),
            Page {
                ready: spec.ready,
                root,
                load_more,
            },
        );
    }

    pub fn add_redirect(&self, from: &str, to: &str) {
        self.state
            .lock()
            .unwrap()
            .redirects
            .insert(from.to_string(), to.to_string());
    }

    pub fn fail_navigation(&self, url: &str) {
        self.state.lock().unwrap().failing_urls.insert(url.to_string());
    }

    pub fn hang_navigation(&self, url: &str) {
        self.state.lock().unwrap().hanging_urls.insert(url.to_string());
    }

    pub fn reject_selector(&self, selector: &str) {
        self.state
            .lock()
            .unwrap()
            .invalid_selectors
            .insert(selector.to_string());
    }

    pub fn open_tabs(&self) -> Vec<TabId> {
        self.state.lock().unwrap().tabs.iter().map(|tab| tab.id).collect()
    }

    pub fn focused(&self) -> Option<TabId> {
        self.state.lock().unwrap().focused
    }

    pub fn max_open_tabs(&self) -> usize {
        self.state.lock().unwrap().max_open_tabs
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn load_more_clicks(&self) -> usize {
        self.state.lock().unwrap().load_more_clicks
    }

    pub fn screenshots(&self) -> usize {
        self.state.lock().unwrap().screenshots
    }

    pub fn url_of(&self, tab: TabId) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .tabs
            .iter()
            .find(|t| t.id == tab)
            .map(|t| t.url.clone())
    }

    /// Value typed into the element matched by `selector` on `url`.
    pub fn typed_value(&self, url: &str, selector: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        let id = *state.pages.get(url)?.root.get(selector)?.first()?;
        state.nodes[id].attrs.get("value").cloned()
    }

    pub fn is_node_selected(&self, url: &str, selector: &str) -> bool {
        let state = self.state.lock().unwrap();
        state
            .pages
            .get(url)
            .and_then(|page| page.root.get(selector))
            .and_then(|ids| ids.first())
            .is_some_and(|id| state.nodes[*id].selected)
    }
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserDriver for FakeBrowser {
    type Element = FakeElement;
    type TabHandle = TabId;

    async fn navigate(&self, url: &str) -> Result<()> {
        let hangs = {
            let mut state = self.state.lock().unwrap();
            state.navigations.push(url.to_string());
            if state.failing_urls.contains(url) {
                bail!("net::ERR_CONNECTION_REFUSED at {url}");
            }
            if state.hanging_urls.contains(url) {
                true
            } else {
                let landing = state
                    .redirects
                    .get(url)
                    .cloned()
                    .unwrap_or_else(|| url.to_string());
                let focused = state.focused.ok_or_else(|| anyhow!("no tab has focus"))?;
                let tab = state
                    .tabs
                    .iter_mut()
                    .find(|tab| tab.id == focused)
                    .ok_or_else(|| anyhow!("focused tab {focused} is closed"))?;
                tab.url = landing;
                false
            }
        };

        if hangs {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.state.lock().unwrap().focused_url()
    }

    async fn query(&self, selector: &str, scope: Option<&FakeElement>) -> Result<Vec<FakeElement>> {
        let state = self.state.lock().unwrap();
        if state.invalid_selectors.contains(selector) {
            bail!("invalid selector '{selector}'");
        }

        if let Some(element) = scope {
            let node = state.node(element)?;
            return Ok(node
                .children
                .get(selector)
                .map(|ids| ids.iter().copied().map(FakeElement).collect())
                .unwrap_or_default());
        }

        let url = state.focused_url()?;
        let Some(page) = state.pages.get(&url) else {
            return Ok(Vec::new());
        };

        if let Some(load_more) = &page.load_more {
            if selector == load_more.item_selector {
                return Ok(load_more.visible_items().into_iter().map(FakeElement).collect());
            }
            if selector == load_more.control_selector {
                return Ok(if load_more.control_visible() {
                    vec![FakeElement(load_more.control)]
                } else {
                    Vec::new()
                });
            }
        }

        Ok(page
            .root
            .get(selector)
            .map(|ids| ids.iter().copied().map(FakeElement).collect())
            .unwrap_or_default())
    }

    async fn element_text(&self, element: &FakeElement) -> Result<String> {
        Ok(self.state.lock().unwrap().node(element)?.text.clone())
    }

    async fn element_attribute(&self, element: &FakeElement, name: &str) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().node(element)?.attrs.get(name).cloned())
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let action = state.node(element)?.on_click.clone();
        match action {
            ClickAction::Nothing => {}
            ClickAction::Select => state.nodes[element.0].selected = true,
            ClickAction::Navigate(target) => {
                let focused = state.focused.ok_or_else(|| anyhow!("no tab has focus"))?;
                if let Some(tab) = state.tabs.iter_mut().find(|tab| tab.id == focused) {
                    tab.url = target;
                }
            }
            ClickAction::LoadMore => {
                state.load_more_clicks += 1;
                let url = state.focused_url()?;
                if let Some(load_more) = state.pages.get_mut(&url).and_then(|p| p.load_more.as_mut())
                    && load_more.stage + 1 < load_more.batches.len()
                {
                    load_more.stage += 1;
                }
            }
        }
        Ok(())
    }

    async fn scroll_into_view(&self, element: &FakeElement) -> Result<()> {
        self.state.lock().unwrap().node(element)?;
        Ok(())
    }

    async fn is_actionable(&self, element: &FakeElement) -> Result<bool> {
        Ok(self.state.lock().unwrap().node(element)?.actionable)
    }

    async fn is_selected(&self, element: &FakeElement) -> Result<bool> {
        Ok(self.state.lock().unwrap().node(element)?.selected)
    }

    async fn fill(&self, element: &FakeElement, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.node(element)?;
        state.nodes[element.0]
            .attrs
            .insert("value".to_string(), text.to_string());
        Ok(())
    }

    async fn document_ready(&self) -> Result<bool> {
        let state = self.state.lock().unwrap();
        let url = state.focused_url()?;
        Ok(state.pages.get(&url).is_none_or(|page| page.ready))
    }

    async fn open_tab(&self) -> Result<TabId> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_tab;
        state.next_tab += 1;
        state.tabs.push(Tab {
            id,
            url: "about:blank".to_string(),
        });
        state.max_open_tabs = state.max_open_tabs.max(state.tabs.len());
        Ok(id)
    }

    async fn close_current_tab(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let focused = state.focused.take().ok_or_else(|| anyhow!("no tab has focus"))?;
        state.tabs.retain(|tab| tab.id != focused);
        Ok(())
    }

    async fn switch_to_tab(&self, tab: &TabId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.tabs.iter().any(|t| t.id == *tab) {
            bail!("no such tab {tab}");
        }
        state.focused = Some(*tab);
        Ok(())
    }

    async fn current_tab(&self) -> Result<TabId> {
        self.state
            .lock()
            .unwrap()
            .focused
            .ok_or_else(|| anyhow!("no tab has focus"))
    }

    async fn list_tab_handles(&self) -> Result<Vec<TabId>> {
        Ok(self.open_tabs())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.screenshots += 1;
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }
}

/// Catalog entry `n` with every base field populated.
pub fn catalog_entry(n: usize) -> NodeSpec {
    NodeSpec::empty()
        .child(".catalog-company", NodeSpec::text(format!("Company {n}")))
        .child(".catalog-name", NodeSpec::text(format!("Person {n}")))
        .child(".catalog-position", NodeSpec::text(format!("Role {n}")))
        .child(
            "a.catalog-link",
            NodeSpec::text("Voir la fiche").attr("href", detail_path(n)),
        )
        .child(
            ".catalog-avatar img",
            NodeSpec::empty().attr("src", format!("https://cdn.example.org/avatar/{n}.png")),
        )
}

pub fn detail_path(n: usize) -> String {
    format!("/fr/sheet/926247/user/{n}")
}

pub fn detail_url(n: usize) -> String {
    format!("{BASE_URL}{}", detail_path(n))
}

pub fn forward_url(n: usize) -> String {
    format!("{BASE_URL}/forward/{n}")
}

pub fn profile_url(n: usize) -> String {
    format!("https://www.linkedin.com/in/person-{n}")
}

/// Detail page with every section and a forwarding link for entry `n`.
pub fn detail_page(n: usize) -> PageSpec {
    PageSpec::new()
        .with(
            "#object-d6fa1ac7 .section__content li",
            NodeSpec::text(format!("Effectifs : {n}0 salariés")),
        )
        .with(
            "#object-d6fa1ac7 .section__content li",
            NodeSpec::text("Chiffre d'affaires : 5 M€"),
        )
        .with(
            "#object-d6fa1ac7 .section__content li",
            NodeSpec::text("Expertise retail et digital"),
        )
        .with(
            "#object-Me3f9M9edd .section__content li.highlight",
            NodeSpec::text("Distribution"),
        )
        .with(
            "#object-M4561Macb7 .section__content li",
            NodeSpec::text(format!("Mission {n}")),
        )
        .with(
            "#object-M91ceM1169 .section__content li.highlight",
            NodeSpec::text("120"),
        )
        .with(
            "#object-M184bM50c8 .section__content li.highlight",
            NodeSpec::text("Logistique"),
        )
        .with(
            "a[href*='forward/'][target='_blank']",
            NodeSpec::text("LinkedIn").attr("href", format!("/forward/{n}")),
        )
}

/// Detail page without any outbound profile link.
pub fn detail_page_without_link(n: usize) -> PageSpec {
    PageSpec::new()
        .with(
            "#object-d6fa1ac7 .section__content li",
            NodeSpec::text(format!("Effectifs : {n}0 salariés")),
        )
        .with(
            "#object-Me3f9M9edd .section__content li.highlight",
            NodeSpec::text("Distribution"),
        )
        .with(
            "#object-M4561Macb7 .section__content li",
            NodeSpec::text(format!("Mission {n}")),
        )
}

/// Catalog of `total` entries revealed in `batches`, each with a detail page
/// whose forwarding link lands behind an authentication wall.
pub fn catalog_site(total: usize, batches: Vec<usize>) -> FakeBrowser {
    let browser = FakeBrowser::new();
    browser.add_page(
        CATALOG_URL,
        PageSpec::new().with_load_more(LoadMoreSpec {
            item_selector: ".catalog__item".to_string(),
            control_selector: ".btn.btn-primary.see-more".to_string(),
            items: (1..=total).map(catalog_entry).collect(),
            batches,
            control_actionable: true,
            control_outlives_last_batch: false,
        }),
    );

    for n in 1..=total {
        browser.add_page(&detail_url(n), detail_page(n));
        browser.add_redirect(
            &forward_url(n),
            &format!(
                "https://www.linkedin.com/authwall?trk=bf&sessionRedirect={}",
                urlencoding::encode(&format!("{}?trk=spot", profile_url(n)))
            ),
        );
    }

    browser
}

/// Configuration with every pause removed and short timeouts.
pub fn fast_config() -> EnrichConfig {
    EnrichConfig::builder()
        .catalog_url(CATALOG_URL)
        .page_load_timeout(Duration::from_secs(5))
        .readiness_timeout(Duration::from_secs(1))
        .control_timeout(Duration::from_secs(1))
        .scroll_settle(Duration::ZERO)
        .load_more_settle(Duration::ZERO)
        .detail_settle(Duration::ZERO)
        .redirect_settle(Duration::ZERO)
        .item_delay(Duration::ZERO)
        .sort_option_selector(None)
        .build()
        .expect("test config must build")
}
