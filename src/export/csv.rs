use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{RouteExporter, output_coords};
use crate::domain::FlightPath;
use crate::error::Result;
use crate::geometry::Projector;

/// Spreadsheet-friendly waypoint table: `leg,x,y`, one row per waypoint
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    projector: Option<Projector>,
}

impl CsvExporter {
    pub fn new(projector: Option<Projector>) -> Self {
        Self { projector }
    }

    fn write_rows<W: Write>(&self, writer: &mut W, paths: &[FlightPath]) -> std::io::Result<()> {
        writeln!(writer, "leg,x,y")?;
        for path in paths {
            for (leg, points) in [("to", &path.outbound), ("back", &path.inbound)] {
                for c in points {
                    let (x, y) = output_coords(self.projector.as_ref(), c.x, c.y);
                    writeln!(writer, "{leg},{x},{y}")?;
                }
            }
        }
        Ok(())
    }
}

impl RouteExporter for CsvExporter {
    fn export(&self, paths: &[FlightPath], path: &Path) -> Result<usize> {
        if paths.is_empty() {
            tracing::warn!("No flight paths to export");
            return Ok(0);
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_rows(&mut writer, paths)?;
        writer.flush()?;

        Ok(paths.len())
    }
}
