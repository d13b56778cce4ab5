/// The two collapsible side panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
	Publications,
	Summary,
}

/// Show/hide state of the side panels. Independent of the fetched data: hiding a
/// panel never discards anything, and toggling works in every session status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelVisibility {
	publications: bool,
	summary: bool,
}

impl Default for PanelVisibility {
	fn default() -> Self {
		Self {
			publications: true,
			summary: true,
		}
	}
}

impl PanelVisibility {
	pub fn is_visible(&self, panel: Panel) -> bool {
		match panel {
			Panel::Publications => self.publications,
			Panel::Summary => self.summary,
		}
	}

	pub fn toggle(&mut self, panel: Panel) {
		let flag = self.flag_mut(panel);
		*flag = !*flag;
	}

	pub fn show(&mut self, panel: Panel) {
		*self.flag_mut(panel) = true;
	}

	fn flag_mut(&mut self, panel: Panel) -> &mut bool {
		match panel {
			Panel::Publications => &mut self.publications,
			Panel::Summary => &mut self.summary,
		}
	}
}
