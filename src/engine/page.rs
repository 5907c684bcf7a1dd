// Relay Engine — Dial Page
//
// Self-contained HTML page: a round dial the user drags around. Each
// pointer-move while the button is held sends the angle change since the
// previous move over one WebSocket opened at load.

use crate::atoms::constants::WS_PATH;
use crate::atoms::types::SinkKind;

/// Build the page once; the server shares the result across connections.
pub fn build_page_html(sink: SinkKind) -> String {
    let mode = match sink {
        SinkKind::Scroll => "Drag the dial to scroll",
        SinkKind::Echo => "Drag the dial (echo mode)",
    };
    PAGE_TEMPLATE
        .replace("{{MODE}}", mode)
        .replace("{{WS_PATH}}", WS_PATH)
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Scroll Dial</title>
  <style>
    body {
      display: flex;
      flex-direction: column;
      justify-content: center;
      align-items: center;
      height: 100vh;
      background: #282c34;
      margin: 0;
      color: white;
      font-family: Arial, sans-serif;
      user-select: none;
    }
    #disk {
      width: 200px;
      height: 200px;
      background: radial-gradient(circle, #4b4b4b, #1f1f1f);
      border-radius: 50%;
      border: 4px solid #ccc;
      position: relative;
      touch-action: none;
      cursor: grab;
    }
    #disk::after {
      content: "";
      position: absolute;
      top: 12px;
      left: 50%;
      width: 6px;
      height: 24px;
      margin-left: -3px;
      border-radius: 3px;
      background: #ccc;
    }
    #status { margin-top: 24px; font-size: 14px; color: #9da5b4; }
  </style>
</head>
<body>
  <div id="disk"></div>
  <div id="status">{{MODE}}</div>
  <script>
    const disk = document.getElementById('disk');
    const status = document.getElementById('status');
    const socket = new WebSocket('ws://' + location.host + '{{WS_PATH}}');
    let lastAngle = null;
    let turned = 0;

    socket.onclose = () => { status.textContent = 'Disconnected'; };
    socket.onmessage = (event) => {
      try {
        status.textContent = 'Echo: ' + JSON.parse(event.data).rotation.toFixed(2) + '°';
      } catch (_) {}
    };

    function calculateAngle(event) {
      const rect = disk.getBoundingClientRect();
      const centerX = rect.left + rect.width / 2;
      const centerY = rect.top + rect.height / 2;
      return Math.atan2(event.clientY - centerY, event.clientX - centerX) * (180 / Math.PI);
    }

    disk.addEventListener('pointerdown', (event) => {
      disk.setPointerCapture(event.pointerId);
      lastAngle = calculateAngle(event);
    });

    disk.addEventListener('pointerup', () => { lastAngle = null; });

    disk.addEventListener('pointermove', (event) => {
      if (event.buttons !== 1 || lastAngle === null) return;
      const currentAngle = calculateAngle(event);
      let deltaAngle = currentAngle - lastAngle;
      if (deltaAngle > 180) deltaAngle -= 360;
      if (deltaAngle < -180) deltaAngle += 360;
      lastAngle = currentAngle;
      turned += deltaAngle;
      disk.style.transform = 'rotate(' + turned + 'deg)';
      if (socket.readyState === WebSocket.OPEN) {
        socket.send(JSON.stringify({ rotation: deltaAngle }));
      }
    });
  </script>
</body>
</html>
"#;
