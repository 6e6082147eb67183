use image::RgbaImage;

/// Return a copy of `image` rendered as flat `block` x `block` tiles.
///
/// Each tile takes the colour of its top-left pixel. Tiles on the right and
/// bottom edges are clipped to the image. A block size of 0 or 1 leaves the
/// image unchanged.
pub fn pixelate(image: &RgbaImage, block: u32) -> RgbaImage {
    let mut out = image.clone();
    pixelate_in_place(&mut out, block);
    out
}

/// In-place variant of [`pixelate`] for buffers read back from a canvas.
pub fn pixelate_in_place(image: &mut RgbaImage, block: u32) {
    if block <= 1 {
        return;
    }
    let (width, height) = image.dimensions();
    for cell_y in (0..height).step_by(block as usize) {
        let cell_h = block.min(height - cell_y);
        for cell_x in (0..width).step_by(block as usize) {
            let cell_w = block.min(width - cell_x);
            let color = *image.get_pixel(cell_x, cell_y);
            for y in cell_y..cell_y + cell_h {
                for x in cell_x..cell_x + cell_w {
                    image.put_pixel(x, y, color);
                }
            }
        }
    }
}
