use crate::cache::SessionCache;
use crate::catalog::{
    AdminAction, CatalogItem, FormField, ItemForm, PayloadError, build_admin_payload,
};
use crate::editor::LineEditor;
use crate::types::{
    ActiveTab, ChatTurn, EndpointField, InputMode, LoadingState, PanelFocus, QueryOutcome,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// State shared between the UI loop and background tasks
pub type SharedState = Arc<RwLock<AppState>>;

/// Read the shared state, recovering from a panicked writer
pub fn read_state(state: &SharedState) -> RwLockReadGuard<'_, AppState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_state(state: &SharedState) -> RwLockWriteGuard<'_, AppState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// State of a question/answer tab (search or listing)
#[derive(Debug, Clone)]
pub struct QueryState {
    pub input: LineEditor,
    pub loading: LoadingState,
    pub outcome: Option<QueryOutcome>,
    /// Text that produced `outcome`, used as the export title
    pub last_query: String,
    pub selected: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            input: LineEditor::new(),
            loading: LoadingState::Idle,
            outcome: None,
            last_query: String::new(),
            selected: 0,
        }
    }
}

impl QueryState {
    pub fn items(&self) -> &[CatalogItem] {
        self.outcome
            .as_ref()
            .map(|o| o.response.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn answer(&self) -> &str {
        self.outcome
            .as_ref()
            .map(|o| o.response.answer.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct AdminState {
    pub action: AdminAction,
    /// One editor per `FormField::ALL` entry
    pub fields: Vec<LineEditor>,
    pub cleared: BTreeSet<FormField>,
    pub selected_field: usize,
    pub loading: LoadingState,
    /// Backend answer to the last operation
    pub message: Option<String>,
    pub autofill: LoadingState,
}

impl Default for AdminState {
    fn default() -> Self {
        Self {
            action: AdminAction::Create,
            fields: vec![LineEditor::new(); FormField::ALL.len()],
            cleared: BTreeSet::new(),
            selected_field: 0,
            loading: LoadingState::Idle,
            message: None,
            autofill: LoadingState::Idle,
        }
    }
}

impl AdminState {
    pub fn selected(&self) -> FormField {
        FormField::ALL[self.selected_field.min(FormField::ALL.len() - 1)]
    }

    pub fn field(&self, field: FormField) -> &LineEditor {
        &self.fields[field_index(field)]
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut LineEditor {
        &mut self.fields[field_index(field)]
    }

    /// Form contents; a field marked cleared sends no value
    pub fn to_form(&self) -> ItemForm {
        let mut form = ItemForm::new();
        for field in FormField::ALL {
            if self.cleared.contains(&field) {
                form.mark_cleared(field);
            } else {
                form.set(field, self.field(field).content());
            }
        }
        form
    }

    pub fn payload(&self, now: DateTime<Utc>) -> Result<Value, PayloadError> {
        build_admin_payload(self.action, &self.to_form(), now)
    }

    pub fn clear_form(&mut self) {
        for editor in &mut self.fields {
            editor.clear();
        }
        self.cleared.clear();
        self.selected_field = 0;
    }

    /// Prefill the form from a record, switching to update
    pub fn load_item(&mut self, item: &CatalogItem) {
        self.clear_form();
        let num = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        self.field_mut(FormField::SetNumber).set_content(num(item.set_number));
        self.field_mut(FormField::Name).set_content(text(&item.name));
        self.field_mut(FormField::Theme).set_content(text(&item.theme));
        self.field_mut(FormField::Year).set_content(num(item.year));
        self.field_mut(FormField::Pieces).set_content(num(item.pieces));
        self.field_mut(FormField::Storage).set_content(text(&item.storage));
        self.field_mut(FormField::StorageBox).set_content(num(item.storage_box()));
        self.field_mut(FormField::Condition).set_content(text(&item.condition));
        self.field_mut(FormField::ImageUrl).set_content(text(&item.image_url));
        self.field_mut(FormField::LegoWebUrl).set_content(text(&item.lego_web_url));
        self.field_mut(FormField::Manuals).set_content(item.manuals.join(", "));
        self.field_mut(FormField::MinifigNames).set_content(item.minifig_names.join(", "));
        self.field_mut(FormField::MinifigNumbers).set_content(item.minifigs_numbers.join(", "));
        self.field_mut(FormField::Tags).set_content(item.tags.join(", "));
        self.action = AdminAction::Update;
    }

    /// Fill fields that are still empty; returns the fields that changed
    pub fn fill_empty(&mut self, values: &[(FormField, String)]) -> Vec<FormField> {
        let mut filled = Vec::new();
        for (field, value) in values {
            let editor = self.field_mut(*field);
            if editor.content().trim().is_empty() && !value.trim().is_empty() {
                editor.set_content(value.trim());
                filled.push(*field);
            }
        }
        filled
    }
}

fn field_index(field: FormField) -> usize {
    FormField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct AssistantState {
    pub input: LineEditor,
    pub turns: Vec<ChatTurn>,
    pub loading: LoadingState,
    /// Records returned by catalog searches the assistant made
    pub items: Vec<CatalogItem>,
    pub selected: usize,
    pub speech: LoadingState,
}

impl AssistantState {
    pub fn last_answer(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.speaker == crate::types::Speaker::Assistant)
            .map(|t| t.text.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub active_tab: ActiveTab,
    pub panel_focus: PanelFocus,
    /// Scroll offset for the results panel (lines)
    pub results_scroll: usize,
    /// Scroll offset for the detail modal (lines)
    pub detail_scroll: usize,
    pub yank_flash: bool,
    /// One-line feedback shown in the footer
    pub status: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_tab: ActiveTab::Search,
            panel_focus: PanelFocus::Form,
            results_scroll: 0,
            detail_scroll: 0,
            yank_flash: false,
            status: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputState {
    pub mode: InputMode,
    /// Search, admin and listing URLs in the configuration modal
    pub endpoint_fields: Vec<LineEditor>,
    pub active_endpoint_field: EndpointField,
    /// Validation error shown inside the configuration modal
    pub endpoint_error: Option<String>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            endpoint_fields: vec![LineEditor::new(); EndpointField::ALL.len()],
            active_endpoint_field: EndpointField::Search,
            endpoint_error: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub ui: UiState,
    pub input: InputState,
    pub search: QueryState,
    pub listing: QueryState,
    pub admin: AdminState,
    pub assistant: AssistantState,
    pub cache: SessionCache,
    /// Record shown in the detail modal
    pub detail: Option<CatalogItem>,
}

impl AppState {
    /// Result list shown in the right panel of the active tab
    pub fn current_items(&self) -> &[CatalogItem] {
        match self.ui.active_tab {
            ActiveTab::Search => self.search.items(),
            ActiveTab::Listing => self.listing.items(),
            ActiveTab::Assistant => &self.assistant.items,
            ActiveTab::Admin => &[],
        }
    }

    pub fn selected_result(&self) -> usize {
        match self.ui.active_tab {
            ActiveTab::Search => self.search.selected,
            ActiveTab::Listing => self.listing.selected,
            ActiveTab::Assistant => self.assistant.selected,
            ActiveTab::Admin => 0,
        }
    }

    pub fn set_selected_result(&mut self, index: usize) {
        let len = self.current_items().len();
        let index = index.min(len.saturating_sub(1));
        match self.ui.active_tab {
            ActiveTab::Search => self.search.selected = index,
            ActiveTab::Listing => self.listing.selected = index,
            ActiveTab::Assistant => self.assistant.selected = index,
            ActiveTab::Admin => {}
        }
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.current_items().get(self.selected_result())
    }

    /// The selected record, preferring the session cache's copy
    pub fn selected_item_cached(&self) -> Option<CatalogItem> {
        let item = self.selected_item()?;
        item.set_number
            .and_then(|id| self.cache.get(id))
            .or(Some(item))
            .cloned()
    }

    /// Editor receiving keystrokes in the current mode, if any
    pub fn focused_editor_mut(&mut self) -> Option<&mut LineEditor> {
        match self.input.mode {
            InputMode::EditingEndpoints => {
                let idx = self.input.active_endpoint_field.index();
                self.input.endpoint_fields.get_mut(idx)
            }
            InputMode::Editing => match self.ui.active_tab {
                ActiveTab::Search => Some(&mut self.search.input),
                ActiveTab::Listing => Some(&mut self.listing.input),
                ActiveTab::Admin => {
                    let field = self.admin.selected();
                    Some(self.admin.field_mut(field))
                }
                ActiveTab::Assistant => Some(&mut self.assistant.input),
            },
            _ => None,
        }
    }

    /// Whether the active tab has a request in flight
    pub fn is_busy(&self) -> bool {
        match self.ui.active_tab {
            ActiveTab::Search => self.search.loading.is_loading(),
            ActiveTab::Listing => self.listing.loading.is_loading(),
            ActiveTab::Admin => {
                self.admin.loading.is_loading() || self.admin.autofill.is_loading()
            }
            ActiveTab::Assistant => {
                self.assistant.loading.is_loading() || self.assistant.speech.is_loading()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SearchResponse;
    use std::time::Duration;

    fn items(ids: &[i64]) -> Vec<CatalogItem> {
        ids.iter()
            .map(|id| CatalogItem {
                set_number: Some(*id),
                ..Default::default()
            })
            .collect()
    }

    fn with_search_results(ids: &[i64]) -> AppState {
        let mut state = AppState::default();
        state.search.outcome = Some(QueryOutcome {
            response: SearchResponse {
                answer: "ok".into(),
                items: items(ids),
            },
            duration: Duration::from_millis(5),
        });
        state
    }

    #[test]
    fn test_current_items_follow_tab() {
        let mut state = with_search_results(&[1, 2]);
        assert_eq!(state.current_items().len(), 2);
        state.ui.active_tab = ActiveTab::Listing;
        assert!(state.current_items().is_empty());
        state.ui.active_tab = ActiveTab::Admin;
        assert!(state.current_items().is_empty());
    }

    #[test]
    fn test_set_selected_result_clamps() {
        let mut state = with_search_results(&[1, 2, 3]);
        state.set_selected_result(10);
        assert_eq!(state.selected_result(), 2);
        assert_eq!(state.selected_item().unwrap().set_number, Some(3));
    }

    #[test]
    fn test_selected_item_prefers_cache() {
        let mut state = with_search_results(&[7]);
        state.cache.remember_all(&[CatalogItem {
            set_number: Some(7),
            name: Some("cached".into()),
            ..Default::default()
        }]);
        assert_eq!(state.selected_item_cached().unwrap().display_name(), "cached");
    }

    #[test]
    fn test_focused_editor_depends_on_mode() {
        let mut state = AppState::default();
        assert!(state.focused_editor_mut().is_none());

        state.input.mode = InputMode::Editing;
        state.focused_editor_mut().unwrap().insert_str("star wars");
        assert_eq!(state.search.input.content(), "star wars");

        state.ui.active_tab = ActiveTab::Admin;
        state.admin.selected_field = 1;
        state.focused_editor_mut().unwrap().insert_str("Falcon");
        assert_eq!(state.admin.field(FormField::Name).content(), "Falcon");
    }

    #[test]
    fn test_admin_load_item_and_payload() {
        let mut admin = AdminState::default();
        admin.load_item(&CatalogItem {
            set_number: Some(75192),
            name: Some("Millennium Falcon".into()),
            storage_box: Some(0),
            minifig_names: vec!["Han".into(), "Leia".into()],
            minifigs_numbers: vec!["sw1".into(), "sw2".into()],
            ..Default::default()
        });

        assert_eq!(admin.action, AdminAction::Update);
        assert_eq!(admin.field(FormField::StorageBox).content(), "");
        assert_eq!(admin.field(FormField::MinifigNames).content(), "Han, Leia");

        let now = Utc::now();
        let payload = admin.payload(now).unwrap();
        assert_eq!(payload["set_number"], 75192);
        assert_eq!(payload["campos"]["minifigs_numbers"][1], "sw2");
    }

    #[test]
    fn test_admin_cleared_fields_reach_form() {
        let mut admin = AdminState::default();
        admin.cleared.insert(FormField::Tags);
        admin.field_mut(FormField::Tags).set_content("viejo");
        let form = admin.to_form();
        assert!(form.is_cleared(FormField::Tags));
        assert_eq!(form.get(FormField::Tags), "");

        admin.action = AdminAction::Update;
        admin.field_mut(FormField::SetNumber).set_content("10294");
        let payload = admin.payload(Utc::now()).unwrap();
        assert!(payload["campos"].get("tags").is_none());
        assert_eq!(payload["borrar"][0], "tags");

        admin.clear_form();
        assert!(admin.cleared.is_empty());
    }

    #[test]
    fn test_fill_empty_keeps_user_input() {
        let mut admin = AdminState::default();
        admin.field_mut(FormField::Name).set_content("Mi nombre");
        let filled = admin.fill_empty(&[
            (FormField::Name, "Nombre oficial".into()),
            (FormField::Pieces, "7541".into()),
        ]);
        assert_eq!(filled, vec![FormField::Pieces]);
        assert_eq!(admin.field(FormField::Name).content(), "Mi nombre");
        assert_eq!(admin.field(FormField::Pieces).content(), "7541");
    }
}
