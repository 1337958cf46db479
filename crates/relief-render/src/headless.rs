//! Headless rendering context for offscreen terrain snapshots

use crate::context::{create_depth_texture, new_instance, request_device, RenderError};

/// Offscreen wgpu context that renders to a texture instead of a window surface
pub struct HeadlessContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    pub color_texture: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl HeadlessContext {
    /// Create a new headless rendering context with the given dimensions
    pub async fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::SurfaceCreation(format!(
                "snapshot size must be non-zero, got {}x{}",
                width, height
            )));
        }

        let instance = new_instance();
        let (_adapter, device, queue) =
            request_device(&instance, None, "Relief Headless Device").await?;

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Snapshot Color Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (depth_texture, depth_view) = create_depth_texture(&device, width, height);

        Ok(Self {
            device,
            queue,
            format,
            width,
            height,
            color_texture,
            color_view,
            depth_texture,
            depth_view,
        })
    }

    /// Read the rendered color texture back as an RGBA image
    pub fn read_image(&self) -> Result<image::RgbaImage, RenderError> {
        let bytes_per_pixel = 4u32;
        let unpadded_bytes_per_row = self.width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Snapshot Readback Buffer"),
            size: (padded_bytes_per_row * self.height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Snapshot Readback Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|e| RenderError::BufferReadFailed(e.to_string()))?
            .map_err(|e| RenderError::BufferReadFailed(e.to_string()))?;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            strip_row_padding(
                &data,
                unpadded_bytes_per_row as usize,
                padded_bytes_per_row as usize,
                self.height as usize,
            )
        };
        staging_buffer.unmap();

        image::RgbaImage::from_raw(self.width, self.height, pixels).ok_or_else(|| {
            RenderError::BufferReadFailed("pixel buffer does not match snapshot size".into())
        })
    }

    /// Aspect ratio of this context
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Copy `rows` rows of `row_len` bytes out of a buffer with `stride`-byte rows
fn strip_row_padding(data: &[u8], row_len: usize, stride: usize, rows: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(row_len * rows);
    for row in 0..rows {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_len]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_is_removed_per_row() {
        let data = [1, 2, 0, 0, 3, 4, 0, 0];
        assert_eq!(strip_row_padding(&data, 2, 4, 2), vec![1, 2, 3, 4]);
    }

    #[test]
    fn unpadded_rows_pass_through() {
        let data: Vec<u8> = (0..12).collect();
        assert_eq!(strip_row_padding(&data, 4, 4, 3), data);
    }
}
