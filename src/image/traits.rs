/// Row-oriented read access shared by the raster, grayscale and float buffers.
///
/// A row holds `width() * channels()` interleaved samples; `stride()` is the
/// distance in samples between the starts of two consecutive rows.
pub trait ImageView {
    type Sample: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn channels(&self) -> usize {
        1
    }

    fn row(&self, y: usize) -> &[Self::Sample];

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn same_dims<O: ImageView>(&self, other: &O) -> bool
    where
        Self: Sized,
    {
        self.width() == other.width() && self.height() == other.height()
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Sample];
}
