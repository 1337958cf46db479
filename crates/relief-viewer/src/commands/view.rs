//! Interactive viewer window

use anyhow::Result;
use relief_viewer::{ViewerApp, ViewerConfig};
use winit::event_loop::{ControlFlow, EventLoop};

pub fn run(config: ViewerConfig) -> Result<()> {
    println!("Controls:");
    println!("  Left drag   - Orbit");
    println!("  Right drag  - Pan");
    println!("  Wheel       - Zoom");
    println!("  R           - Reset camera");
    println!("  Escape      - Exit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
