//! Order composition: files, print options, validation and payload building.
//!
//! An [`OrderDraft`] holds the files a customer picked together with their
//! print options. Prices are recomputed from the estimated page count on
//! every change, so the draft's total always equals the sum of its files.

use core::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{PrintHubError, Result};
use crate::models::{
    ColorMode, NewOrder, OrderFile, OrderStatus, PaperSize, ShopId, UploadedFile, UserId,
};
use crate::pricing::{self, FileKind, PageEstimate};

/// Message shown when no file was picked.
const MISSING_FILES: &str = "Vui lòng chọn ít nhất 1 file.";

/// Message shown when no pickup date was picked.
const MISSING_DATE: &str = "Vui lòng chọn ngày nhận.";

/// Message shown when no pickup time was picked.
const MISSING_TIME: &str = "Vui lòng chọn giờ nhận.";

/// Per-field validation and submission errors.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderErrors {
    /// Problem with the file list.
    pub files: Option<String>,
    /// Problem with the pickup date.
    pub date: Option<String>,
    /// Problem with the pickup time.
    pub time: Option<String>,
    /// Upload or order-creation failure.
    pub submit: Option<String>,
}

impl OrderErrors {
    /// Builds an error set carrying only a submission failure.
    #[inline]
    #[must_use]
    pub fn submit<T: Into<String>>(message: T) -> Self {
        Self {
            submit: Some(message.into()),
            ..Self::default()
        }
    }

    /// Returns `true` when no field has an error.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files.is_none() && self.date.is_none() && self.time.is_none() && self.submit.is_none()
    }

    /// Iterates over `(field, message)` pairs that are set.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("files", self.files.as_deref()),
            ("date", self.date.as_deref()),
            ("time", self.time.as_deref()),
            ("submit", self.submit.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.map(|msg| (field, msg)))
    }
}

impl fmt::Display for OrderErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// A file picked for printing, with its options and derived price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFile {
    /// File name as picked.
    name: String,
    /// Raw contents, uploaded on submission.
    bytes: Vec<u8>,
    /// Kind detected from the extension.
    kind: FileKind,
    /// Estimated page count.
    estimate: PageEstimate,
    /// Number of copies, at least 1.
    quantity: u32,
    /// Paper size.
    size: PaperSize,
    /// Color mode.
    color: ColorMode,
}

impl DraftFile {
    /// Creates a draft file from its contents with default options
    /// (one copy, A4, color).
    #[must_use]
    pub fn from_bytes<T: Into<String>>(file_name: T, bytes: Vec<u8>) -> Self {
        let name = file_name.into();
        let kind = FileKind::from_name(&name);
        let estimate = pricing::estimate_pages(kind, &bytes);
        tracing::debug!(%name, ?kind, pages = estimate.pages, "estimated pages");
        Self {
            name,
            bytes,
            kind,
            estimate,
            quantity: 1,
            size: PaperSize::default(),
            color: ColorMode::default(),
        }
    }

    /// Reads a draft file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PrintHubError::Document`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|err| PrintHubError::Document(format!("{}: {err}", path.display())))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self::from_bytes(name, bytes))
    }

    /// Returns the file name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw contents.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the detected kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        self.kind
    }

    /// Returns the page estimate.
    #[inline]
    #[must_use]
    pub const fn estimate(&self) -> PageEstimate {
        self.estimate
    }

    /// Returns the estimated page count.
    #[inline]
    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.estimate.pages
    }

    /// Returns the number of copies.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the paper size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> PaperSize {
        self.size
    }

    /// Returns the color mode.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> ColorMode {
        self.color
    }

    /// Sets the number of copies; values below 1 become 1.
    #[inline]
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Sets the paper size.
    #[inline]
    pub const fn set_size(&mut self, size: PaperSize) {
        self.size = size;
    }

    /// Sets the color mode.
    #[inline]
    pub const fn set_color(&mut self, color: ColorMode) {
        self.color = color;
    }

    /// Builder-style [`set_quantity`](Self::set_quantity).
    #[inline]
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.set_quantity(quantity);
        self
    }

    /// Builder-style [`set_size`](Self::set_size).
    #[inline]
    #[must_use]
    pub const fn with_size(mut self, size: PaperSize) -> Self {
        self.size = size;
        self
    }

    /// Builder-style [`set_color`](Self::set_color).
    #[inline]
    #[must_use]
    pub const fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// Price of this file in VND.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> u64 {
        pricing::file_price(self.kind, self.estimate.pages, self.size, self.color, self.quantity)
    }

    /// Builds the order line for this file once it has been uploaded.
    #[must_use]
    pub fn to_order_file(&self, uploaded: &UploadedFile) -> OrderFile {
        OrderFile {
            name: uploaded.name.clone(),
            url: uploaded.url.clone(),
            quantity: self.quantity,
            size: self.size,
            format: self.color,
            pages: self.estimate.pages,
            price: self.price(),
        }
    }
}

/// An order being composed for one shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Shop receiving the order.
    shop_id: ShopId,
    /// Picked files, in pick order.
    files: Vec<DraftFile>,
    /// Pickup date.
    pickup_date: Option<NaiveDate>,
    /// Pickup time.
    pickup_time: Option<NaiveTime>,
    /// Note for the shop.
    note: String,
}

impl OrderDraft {
    /// Starts an empty draft for `shop_id`.
    #[inline]
    #[must_use]
    pub const fn new(shop_id: ShopId) -> Self {
        Self {
            shop_id,
            files: Vec::new(),
            pickup_date: None,
            pickup_time: None,
            note: String::new(),
        }
    }

    /// Returns the target shop.
    #[inline]
    #[must_use]
    pub const fn shop_id(&self) -> &ShopId {
        &self.shop_id
    }

    /// Appends a file.
    #[inline]
    pub fn add_file(&mut self, file: DraftFile) {
        self.files.push(file);
    }

    /// Removes and returns the file at `index`.
    #[inline]
    pub fn remove_file(&mut self, index: usize) -> Option<DraftFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Returns the picked files.
    #[inline]
    #[must_use]
    pub fn files(&self) -> &[DraftFile] {
        &self.files
    }

    /// Returns a mutable handle to the file at `index`.
    #[inline]
    pub fn file_mut(&mut self, index: usize) -> Option<&mut DraftFile> {
        self.files.get_mut(index)
    }

    /// Sets the pickup date.
    #[inline]
    pub const fn set_pickup_date(&mut self, date: NaiveDate) {
        self.pickup_date = Some(date);
    }

    /// Sets the pickup time.
    #[inline]
    pub const fn set_pickup_time(&mut self, time: NaiveTime) {
        self.pickup_time = Some(time);
    }

    /// Returns the pickup date.
    #[inline]
    #[must_use]
    pub const fn pickup_date(&self) -> Option<NaiveDate> {
        self.pickup_date
    }

    /// Returns the pickup time.
    #[inline]
    #[must_use]
    pub const fn pickup_time(&self) -> Option<NaiveTime> {
        self.pickup_time
    }

    /// Sets the note for the shop.
    #[inline]
    pub fn set_note<T: Into<String>>(&mut self, note: T) {
        self.note = note.into();
    }

    /// Returns the note.
    #[inline]
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Sum of the file prices in VND.
    #[inline]
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.files.iter().map(DraftFile::price).sum()
    }

    /// Checks that files, date and time are present.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors when anything is missing.
    pub fn validate(&self) -> core::result::Result<(), OrderErrors> {
        let errors = OrderErrors {
            files: self.files.is_empty().then(|| MISSING_FILES.to_owned()),
            date: self.pickup_date.is_none().then(|| MISSING_DATE.to_owned()),
            time: self.pickup_time.is_none().then(|| MISSING_TIME.to_owned()),
            submit: None,
        };
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Builds the order payload from the uploaded files, which must be in
    /// the same order as [`files`](Self::files).
    ///
    /// # Errors
    ///
    /// Returns [`PrintHubError::InvalidOrder`] if the draft does not
    /// validate or the upload count does not match the file count.
    pub fn to_new_order(
        &self,
        uploaded: &[UploadedFile],
        user_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Result<NewOrder> {
        self.validate().map_err(PrintHubError::InvalidOrder)?;
        let (Some(pickup_date), Some(pickup_time)) = (self.pickup_date, self.pickup_time) else {
            return Err(PrintHubError::InvalidOrder(OrderErrors::default()));
        };
        if uploaded.len() != self.files.len() {
            return Err(PrintHubError::InvalidOrder(OrderErrors::submit(format!(
                "{} of {} files uploaded",
                uploaded.len(),
                self.files.len()
            ))));
        }
        let files: Vec<OrderFile> = self
            .files
            .iter()
            .zip(uploaded)
            .map(|(file, upload)| file.to_order_file(upload))
            .collect();
        let total_amount = files.iter().map(|file| file.price).sum();
        Ok(NewOrder {
            shop_id: self.shop_id.clone(),
            user_id,
            files,
            pickup_date,
            pickup_time,
            note: self.note.clone(),
            total_amount,
            status: OrderStatus::Pending,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_like(pages_by_size: usize) -> Vec<u8> {
        vec![b'x'; pages_by_size * 75 * 1024]
    }

    fn ready_draft() -> OrderDraft {
        let mut draft = OrderDraft::new(ShopId::from("3"));
        draft.add_file(
            DraftFile::from_bytes("a.pdf", pdf_like(1)).with_color(ColorMode::Monochrome),
        );
        draft.add_file(DraftFile::from_bytes("b.png", vec![1, 2, 3]).with_quantity(2));
        draft.set_pickup_date(NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        draft.set_pickup_time(NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        draft
    }

    fn uploads(n: usize) -> Vec<UploadedFile> {
        (0..n)
            .map(|i| UploadedFile {
                url: format!("https://files.example/{i}"),
                name: format!("file-{i}"),
            })
            .collect()
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let errors = OrderDraft::new(ShopId::from("1")).validate().unwrap_err();
        assert_eq!(errors.files.as_deref(), Some(MISSING_FILES));
        assert_eq!(errors.date.as_deref(), Some(MISSING_DATE));
        assert_eq!(errors.time.as_deref(), Some(MISSING_TIME));
        assert!(errors.submit.is_none());
        assert!(errors.to_string().starts_with("files: "));
    }

    #[test]
    fn complete_draft_validates() {
        assert!(ready_draft().validate().is_ok());
    }

    #[test]
    fn quantity_is_clamped_to_one() {
        let mut file = DraftFile::from_bytes("x.pdf", Vec::new());
        file.set_quantity(0);
        assert_eq!(file.quantity(), 1);
    }

    #[test]
    fn total_is_sum_of_file_prices() {
        let draft = ready_draft();
        // a.pdf: 350 * 1 * 1 * 1 -> 1000; b.png: 350 * 2 * 1 * 2 = 1400 -> 1000
        assert_eq!(draft.files()[0].price(), 1000);
        assert_eq!(draft.files()[1].price(), 1000);
        assert_eq!(draft.total_price(), 2000);
    }

    #[test]
    fn option_changes_reprice() {
        let mut draft = ready_draft();
        let file = draft.file_mut(0).unwrap();
        file.set_size(PaperSize::A3);
        file.set_quantity(3);
        // 700 * 1 * 1 * 3 = 2100 -> 2000
        assert_eq!(draft.files()[0].price(), 2000);
        assert_eq!(draft.total_price(), 3000);
    }

    #[test]
    fn remove_file_out_of_range_is_none() {
        let mut draft = ready_draft();
        assert!(draft.remove_file(5).is_none());
        assert_eq!(draft.remove_file(0).unwrap().name(), "a.pdf");
        assert_eq!(draft.files().len(), 1);
    }

    #[test]
    fn payload_uses_uploaded_names_and_totals() {
        let draft = ready_draft();
        let now = DateTime::from_timestamp(1_750_000_000, 0).unwrap();
        let order = draft
            .to_new_order(&uploads(2), Some(UserId::from("u1")), now)
            .unwrap();
        assert_eq!(order.files[1].name, "file-1");
        assert_eq!(order.files[1].quantity, 2);
        assert_eq!(order.files[0].format, ColorMode::Monochrome);
        assert_eq!(order.total_amount, 2000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, now);
    }

    #[test]
    fn payload_rejects_missing_uploads() {
        let err = ready_draft()
            .to_new_order(&uploads(1), None, Utc::now())
            .unwrap_err();
        let PrintHubError::InvalidOrder(errors) = err else {
            panic!("expected invalid order, got {err:?}");
        };
        assert!(errors.submit.is_some());
    }

    #[test]
    fn from_path_reads_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.doc");
        std::fs::write(&path, vec![0_u8; 31 * 1024]).unwrap();
        let file = DraftFile::from_path(&path).unwrap();
        assert_eq!(file.name(), "notes.doc");
        assert_eq!(file.kind(), FileKind::Doc);
        assert_eq!(file.pages(), 2);
    }
}
