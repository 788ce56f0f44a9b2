use std::fmt;

use crate::tile::{TileId, TileTag};

pub const GROUP_CAPACITY: usize = 4;

#[derive(Debug, Clone)]
pub struct SelectionBoard {
    selected: Vec<TileId>,
    groups: Vec<Vec<TileId>>,
    capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected { group: usize },
    Released(ReleaseOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub group: usize,
    pub group_removed: bool,
    pub shifted: Vec<(TileId, usize)>,
    pub promoted: Vec<TileId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsumeOutcome {
    pub consumed: Vec<TileId>,
    pub shifted: Vec<(TileId, usize)>,
    pub promoted: Vec<TileId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub cleared: Vec<(TileId, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardFault {
    AlreadySelected(TileId),
    NotSelected(TileId),
}

impl fmt::Display for BoardFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardFault::AlreadySelected(tile) => write!(f, "tile {tile} is already selected"),
            BoardFault::NotSelected(tile) => write!(f, "tile {tile} is not selected"),
        }
    }
}

impl std::error::Error for BoardFault {}

impl SelectionBoard {
    pub fn new() -> Self {
        Self::with_capacity(GROUP_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            selected: Vec::new(),
            groups: Vec::new(),
            // A zero capacity would mint empty groups forever.
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn selected(&self) -> &[TileId] {
        &self.selected
    }

    pub fn groups(&self) -> &[Vec<TileId>] {
        &self.groups
    }

    pub fn active_group(&self) -> &[TileId] {
        self.groups.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, tile: TileId) -> bool {
        self.selected.contains(&tile)
    }

    pub fn group_of(&self, tile: TileId) -> Option<usize> {
        self.groups.iter().position(|group| group.contains(&tile))
    }

    pub fn expected_tags(&self, tile: TileId) -> Vec<TileTag> {
        let mut tags = vec![TileTag::Item];
        if let Some(group) = self.group_of(tile) {
            tags.push(TileTag::Group(group));
        }
        tags
    }

    pub fn toggle(&mut self, tile: TileId) -> ToggleOutcome {
        match self.group_of(tile) {
            Some(group) => ToggleOutcome::Released(self.release_at(tile, group)),
            None => ToggleOutcome::Selected {
                group: self.assign(tile),
            },
        }
    }

    pub fn select(&mut self, tile: TileId) -> Result<usize, BoardFault> {
        if self.is_selected(tile) {
            return Err(BoardFault::AlreadySelected(tile));
        }
        Ok(self.assign(tile))
    }

    pub fn release(&mut self, tile: TileId) -> Result<ReleaseOutcome, BoardFault> {
        let Some(group) = self.group_of(tile) else {
            return Err(BoardFault::NotSelected(tile));
        };
        Ok(self.release_at(tile, group))
    }

    pub fn consume_active(&mut self) -> ConsumeOutcome {
        if self.groups.is_empty() {
            return ConsumeOutcome::default();
        }
        let consumed = self.groups[0].clone();
        self.selected.retain(|entry| !consumed.contains(entry));
        let (shifted, promoted) = self.remove_group(0);
        ConsumeOutcome {
            consumed,
            shifted,
            promoted,
        }
    }

    pub fn clear(&mut self) -> ClearOutcome {
        self.selected.clear();
        let mut cleared = Vec::new();
        for (index, group) in self.groups.iter().enumerate() {
            for tile in group {
                cleared.push((*tile, index));
            }
        }
        self.groups.clear();
        ClearOutcome { cleared }
    }

    fn assign(&mut self, tile: TileId) -> usize {
        self.selected.push(tile);
        let group = match self
            .groups
            .iter()
            .position(|group| group.len() < self.capacity)
        {
            Some(index) => index,
            None => {
                self.groups.push(Vec::new());
                self.groups.len() - 1
            }
        };
        self.groups[group].push(tile);
        group
    }

    fn release_at(&mut self, tile: TileId, group: usize) -> ReleaseOutcome {
        self.selected.retain(|entry| *entry != tile);
        self.groups[group].retain(|entry| *entry != tile);
        let group_removed = self.groups[group].is_empty();
        let (shifted, promoted) = if group_removed {
            self.remove_group(group)
        } else {
            (Vec::new(), Vec::new())
        };
        ReleaseOutcome {
            group,
            group_removed,
            shifted,
            promoted,
        }
    }

    fn remove_group(&mut self, index: usize) -> (Vec<(TileId, usize)>, Vec<TileId>) {
        self.groups.remove(index);
        let mut shifted = Vec::new();
        for (new_index, group) in self.groups.iter().enumerate().skip(index) {
            for tile in group {
                shifted.push((*tile, new_index));
            }
        }
        let promoted = if index == 0 {
            self.active_group().to_vec()
        } else {
            Vec::new()
        };
        (shifted, promoted)
    }
}

impl Default for SelectionBoard {
    fn default() -> Self {
        Self::new()
    }
}
