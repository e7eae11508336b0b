//! Gallery grid and lightbox state
//!
//! The lightbox holds the page scroll lock for as long as an image is
//! enlarged. The lock is an RAII guard, so every way out of the lightbox
//! (close, replacing the gallery, dropping the model) gives scrolling back.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{ensure, Result};

use super::invitation::GalleryImage;

/// Thumbnails per grid row
pub const GRID_COLUMNS: usize = 2;

/// Page-wide flag that stops the invitation page from scrolling.
///
/// Cloning shares the flag; the page checks [`ScrollLock::is_suspended`]
/// before every scroll.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock {
    suspended: Arc<AtomicBool>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Acquire)
    }

    /// Suspend scrolling until the returned guard is dropped.
    #[must_use = "scrolling resumes as soon as the guard is dropped"]
    pub fn suspend(&self) -> ScrollGuard {
        self.suspended.store(true, Ordering::Release);
        ScrollGuard { lock: self.clone() }
    }

    fn restore(&self) {
        self.suspended.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct ScrollGuard {
    lock: ScrollLock,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.lock.restore();
    }
}

/// Which image, if any, is enlarged.
#[derive(Debug)]
pub struct Lightbox {
    len: usize,
    selection: Option<usize>,
    scroll: ScrollLock,
    guard: Option<ScrollGuard>,
}

impl Lightbox {
    pub fn new(len: usize, scroll: ScrollLock) -> Self {
        Self {
            len,
            selection: None,
            scroll,
            guard: None,
        }
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_some()
    }

    pub fn open(&mut self, index: usize) -> Result<()> {
        ensure!(
            index < self.len,
            "gallery index {} out of range for {} images",
            index,
            self.len
        );
        self.selection = Some(index);
        if self.guard.is_none() {
            self.guard = Some(self.scroll.suspend());
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.selection = None;
        self.guard = None;
        // Unconditional: also clears a flag left behind by anything else
        self.scroll.restore();
    }

    pub fn next(&mut self) {
        if let Some(index) = self.selection {
            self.selection = Some((index + 1) % self.len);
        }
    }

    pub fn previous(&mut self) {
        if let Some(index) = self.selection {
            self.selection = Some((index + self.len - 1) % self.len);
        }
    }
}

/// Gallery images plus the grid cursor and the lightbox over them
#[derive(Debug)]
pub struct GalleryState {
    images: Arc<[GalleryImage]>,
    cursor: usize,
    lightbox: Lightbox,
}

/// Render-side copy of the gallery state
#[derive(Clone, Debug)]
pub struct GalleryView {
    pub images: Arc<[GalleryImage]>,
    pub cursor: usize,
    pub selection: Option<usize>,
}

impl GalleryView {
    pub fn selected_image(&self) -> Option<&GalleryImage> {
        self.selection.and_then(|i| self.images.get(i))
    }
}

impl GalleryState {
    pub fn new(images: Vec<GalleryImage>, scroll: ScrollLock) -> Self {
        let images: Arc<[GalleryImage]> = images.into();
        Self {
            lightbox: Lightbox::new(images.len(), scroll),
            images,
            cursor: 0,
        }
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn lightbox_mut(&mut self) -> &mut Lightbox {
        &mut self.lightbox
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Open the lightbox on the image under the grid cursor.
    pub fn open_at_cursor(&mut self) -> Result<()> {
        self.lightbox.open(self.cursor)
    }

    pub fn set_cursor(&mut self, index: usize) {
        if index < self.images.len() {
            self.cursor = index;
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor % GRID_COLUMNS > 0 {
            self.cursor -= 1;
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor % GRID_COLUMNS < GRID_COLUMNS - 1 && self.cursor + 1 < self.images.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        if self.cursor >= GRID_COLUMNS {
            self.cursor -= GRID_COLUMNS;
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + GRID_COLUMNS < self.images.len() {
            self.cursor += GRID_COLUMNS;
        }
    }

    pub fn view(&self) -> GalleryView {
        GalleryView {
            images: self.images.clone(),
            cursor: self.cursor,
            selection: self.lightbox.selection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<GalleryImage> {
        (0..n)
            .map(|i| GalleryImage {
                id: i.to_string(),
                url: format!("/img/{i}.jpg"),
                alt: format!("Photo {i}"),
                caption: None,
            })
            .collect()
    }

    #[test]
    fn next_and_previous_wrap_around_three_images() {
        let mut lightbox = Lightbox::new(3, ScrollLock::new());
        lightbox.open(0).unwrap();
        lightbox.next();
        assert_eq!(lightbox.selection(), Some(1));
        lightbox.previous();
        assert_eq!(lightbox.selection(), Some(0));
        lightbox.previous();
        assert_eq!(lightbox.selection(), Some(2));
        lightbox.next();
        assert_eq!(lightbox.selection(), Some(0));
    }

    #[test]
    fn n_steps_return_to_start() {
        for n in 1..=7 {
            for start in 0..n {
                let mut lightbox = Lightbox::new(n, ScrollLock::new());
                lightbox.open(start).unwrap();
                for _ in 0..n {
                    lightbox.next();
                }
                assert_eq!(lightbox.selection(), Some(start), "next, n={n} start={start}");
                for _ in 0..n {
                    lightbox.previous();
                }
                assert_eq!(lightbox.selection(), Some(start), "previous, n={n} start={start}");
            }
        }
    }

    #[test]
    fn rapid_presses_wrap_instead_of_clamping() {
        let mut lightbox = Lightbox::new(4, ScrollLock::new());
        lightbox.open(3).unwrap();
        for _ in 0..10 {
            lightbox.next();
        }
        assert_eq!(lightbox.selection(), Some((3 + 10) % 4));
        for _ in 0..9 {
            lightbox.previous();
        }
        assert_eq!(lightbox.selection(), Some(0));
    }

    #[test]
    fn open_then_read_returns_index() {
        let mut lightbox = Lightbox::new(6, ScrollLock::new());
        lightbox.open(4).unwrap();
        assert_eq!(lightbox.selection(), Some(4));
        lightbox.open(1).unwrap();
        assert_eq!(lightbox.selection(), Some(1));
    }

    #[test]
    fn open_rejects_out_of_range_index() {
        let scroll = ScrollLock::new();
        let mut lightbox = Lightbox::new(2, scroll.clone());
        assert!(lightbox.open(2).is_err());
        assert_eq!(lightbox.selection(), None);
        assert!(!scroll.is_suspended());

        let mut empty = Lightbox::new(0, scroll.clone());
        assert!(empty.open(0).is_err());
        assert!(!scroll.is_suspended());
    }

    #[test]
    fn navigation_without_selection_is_noop() {
        let mut lightbox = Lightbox::new(3, ScrollLock::new());
        lightbox.next();
        lightbox.previous();
        assert_eq!(lightbox.selection(), None);
    }

    #[test]
    fn open_suspends_and_close_restores_scrolling() {
        let scroll = ScrollLock::new();
        let mut lightbox = Lightbox::new(3, scroll.clone());
        lightbox.open(2).unwrap();
        assert!(scroll.is_suspended());
        lightbox.next();
        assert!(scroll.is_suspended());
        lightbox.close();
        assert_eq!(lightbox.selection(), None);
        assert!(!scroll.is_suspended());
    }

    #[test]
    fn close_clears_flag_even_when_not_open() {
        let scroll = ScrollLock::new();
        let stray = scroll.suspend();
        let mut lightbox = Lightbox::new(1, scroll.clone());
        lightbox.close();
        assert!(!scroll.is_suspended());
        drop(stray);
        assert!(!scroll.is_suspended());
    }

    #[test]
    fn dropping_an_open_lightbox_releases_scroll() {
        let scroll = ScrollLock::new();
        {
            let mut lightbox = Lightbox::new(2, scroll.clone());
            lightbox.open(1).unwrap();
            assert!(scroll.is_suspended());
        }
        assert!(!scroll.is_suspended());
    }

    #[test]
    fn grid_cursor_stays_inside_two_columns() {
        let mut gallery = GalleryState::new(images(5), ScrollLock::new());
        gallery.cursor_right();
        assert_eq!(gallery.cursor(), 1);
        gallery.cursor_right();
        assert_eq!(gallery.cursor(), 1);
        gallery.cursor_down();
        gallery.cursor_down();
        assert_eq!(gallery.cursor(), 5 - 2);
        // index 5 does not exist, so the cursor stays on row 1
        gallery.cursor_down();
        assert_eq!(gallery.cursor(), 3);
        gallery.cursor_left();
        gallery.cursor_down();
        assert_eq!(gallery.cursor(), 4);
        gallery.cursor_right();
        assert_eq!(gallery.cursor(), 4);
        gallery.cursor_up();
        gallery.cursor_up();
        gallery.cursor_up();
        assert_eq!(gallery.cursor(), 0);
    }

    #[test]
    fn open_at_cursor_uses_cursor_index() {
        let mut gallery = GalleryState::new(images(4), ScrollLock::new());
        gallery.set_cursor(3);
        gallery.open_at_cursor().unwrap();
        let view = gallery.view();
        assert_eq!(view.selection, Some(3));
        assert_eq!(view.selected_image().map(|i| i.id.as_str()), Some("3"));
    }
}
