//! Component data held by the UI thread's tree.

use crate::geometry::Rect;
use std::fmt;

/// Stable handle to a component in the tree.
///
/// Ids are plain values so they can cross threads freely; resolving one back
/// into component data only happens on the UI thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u64);

impl ComponentId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The widget type of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Window,
    Frame,
    Dialog,
    Panel,
    ScrollPane,
    TabbedPane,
    Button,
    ToggleButton,
    CheckBox,
    RadioButton,
    Label,
    TextField,
    TextArea,
    ComboBox,
    List,
    Table,
    Tree,
    Menu,
    MenuItem,
    Slider,
    ProgressBar,
    Custom(&'static str),
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Window => "Window",
            ComponentKind::Frame => "Frame",
            ComponentKind::Dialog => "Dialog",
            ComponentKind::Panel => "Panel",
            ComponentKind::ScrollPane => "ScrollPane",
            ComponentKind::TabbedPane => "TabbedPane",
            ComponentKind::Button => "Button",
            ComponentKind::ToggleButton => "ToggleButton",
            ComponentKind::CheckBox => "CheckBox",
            ComponentKind::RadioButton => "RadioButton",
            ComponentKind::Label => "Label",
            ComponentKind::TextField => "TextField",
            ComponentKind::TextArea => "TextArea",
            ComponentKind::ComboBox => "ComboBox",
            ComponentKind::List => "List",
            ComponentKind::Table => "Table",
            ComponentKind::Tree => "Tree",
            ComponentKind::Menu => "Menu",
            ComponentKind::MenuItem => "MenuItem",
            ComponentKind::Slider => "Slider",
            ComponentKind::ProgressBar => "ProgressBar",
            ComponentKind::Custom(name) => name,
        }
    }

    /// Top-level kinds that may be registered as tree roots.
    pub fn is_window(&self) -> bool {
        matches!(
            self,
            ComponentKind::Window | ComponentKind::Frame | ComponentKind::Dialog
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attributes of a single component.
///
/// Built with the `with_*` methods before insertion, then mutated through
/// [`ComponentTree`](crate::ComponentTree) on the UI thread.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub kind: ComponentKind,
    pub name: Option<String>,
    pub text: Option<String>,
    pub bounds: Rect,
    pub visible: bool,
    pub enabled: bool,
    pub focusable: bool,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            name: None,
            text: None,
            bounds: Rect::default(),
            visible: true,
            enabled: true,
            focusable: matches!(
                kind,
                ComponentKind::Button
                    | ComponentKind::ToggleButton
                    | ComponentKind::CheckBox
                    | ComponentKind::RadioButton
                    | ComponentKind::TextField
                    | ComponentKind::TextArea
                    | ComponentKind::ComboBox
                    | ComponentKind::List
                    | ComponentKind::Table
                    | ComponentKind::Tree
                    | ComponentKind::Slider
            ),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.kind)?;
        match &self.name {
            Some(name) => write!(f, "name='{name}'")?,
            None => f.write_str("name=null")?,
        }
        if let Some(text) = &self.text {
            write!(f, ", text='{text}'")?;
        }
        write!(
            f,
            ", enabled={}, visible={}]",
            self.enabled, self.visible
        )
    }
}
